use anyhow::{Context, Result};
use slug_shortener::config::{self, Config, Environment};
use slug_shortener::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let environment = Environment::from_env()?;
    let dotenv_loaded = config::load_dotenv_for(environment);

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config)?;

    if dotenv_loaded {
        tracing::debug!("Loaded .env file");
    }
    config.print_summary();

    server::run(config).await
}

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG filter '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}
