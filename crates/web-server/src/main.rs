use std::path::Path;

// Entry point for `cargo run -p web-server`: serves the API with the loaded configuration.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = web_server::load_settings(Path::new(".env"))?;
    let _guard = configuration::init_tracing(&config.logging)?;
    web_server::run_server(&config).await
}
