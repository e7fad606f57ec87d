use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalysisConfig, Config, DEFAULT_HISTOGRAM_BINS, DEFAULT_MAX_FORECAST_YEARS, DEFAULT_TOP_N,
    DEFAULT_TREND_THRESHOLD, LogFormat, LoggingConfig, ServerConfig,
};

/// Base name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "datalens";

/// Prefix of environment overrides, e.g. `DATALENS__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "DATALENS";

/// Loads the application configuration from `datalens.toml` (if present) and
/// `DATALENS__*` environment variables, on top of the built-in defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(CONFIG_FILE))
}

/// Same as [`load_config`] but reads the file at `path` instead. A missing file
/// is not an error; every setting has a default.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
