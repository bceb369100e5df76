use anyhow::{Context, Result};
use keycalc::app::App;
use keycalc::config::Config;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_logging(&config, App::uses_plain_mode(&config))?;

    let mut app = App::new(config);
    app.run().await
}

/// Plain mode logs to stderr; the keypad owns the screen, so it logs to a file.
fn init_logging(config: &Config, plain: bool) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("invalid log filter '{}'", config.log_filter))?;

    if plain {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return Ok(());
    }

    let path = config.log_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_target(false)
        .with_ansi(false)
        .init();

    Ok(())
}
