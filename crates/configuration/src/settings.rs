use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// A fitted line whose change across the observed x span, relative to the
/// data scale, stays below this fraction (1%) is classified as a stable trend.
pub const DEFAULT_TREND_THRESHOLD: f64 = 0.01;

/// Number of equal-width bins used for histograms.
pub const DEFAULT_HISTOGRAM_BINS: usize = 10;

/// Length of the top and bottom performer lists in bar reports.
pub const DEFAULT_TOP_N: usize = 5;

/// Upper bound on the number of periods a single prediction may extrapolate.
pub const DEFAULT_MAX_FORECAST_YEARS: u32 = 100;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self.server.body_limit_mb == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_mb must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Maximum accepted request body, in megabytes.
    pub body_limit_mb: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            body_limit_mb: 50,
        }
    }
}

/// Tunables of the analysis and forecasting engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Relative slope below which a trend is reported as stable.
    pub trend_threshold: f64,
    pub histogram_bins: usize,
    pub top_n: usize,
    pub max_forecast_years: u32,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.trend_threshold.is_finite() || self.trend_threshold < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "analysis.trend_threshold must be a non-negative number, got {}",
                self.trend_threshold
            )));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.top_n must be at least 1".to_string(),
            ));
        }
        if self.max_forecast_years == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.max_forecast_years must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_threshold: DEFAULT_TREND_THRESHOLD,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            top_n: DEFAULT_TOP_N,
            max_forecast_years: DEFAULT_MAX_FORECAST_YEARS,
        }
    }
}

/// Output layout of log lines written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}
