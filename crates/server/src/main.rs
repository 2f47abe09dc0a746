mod bootstrap;

use anyhow::Result;
use norrisbot_core::config::{AppConfig, LoadOptions};
use norrisbot_slack::RunnerExit;

fn init_logging(config: &AppConfig) {
    use norrisbot_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let mut app = bootstrap::bootstrap_with_config(config)?;

    tracing::info!(
        event_name = "system.server.started",
        bot_name = %app.config.bot.name,
        db_path = %app.config.database.path.display(),
        "norrisbot starting"
    );
    tokio::select! {
        exit = app.runner.start() => {
            match exit {
                RunnerExit::Closed => tracing::info!(
                    event_name = "system.server.session_closed",
                    "slack session closed"
                ),
                RunnerExit::ConnectFailed | RunnerExit::ReceiveFailed => tracing::error!(
                    event_name = "system.server.session_failed",
                    exit = ?exit,
                    "slack session failed; not reconnecting"
                ),
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            tracing::info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                "norrisbot stopping"
            );
        }
    }

    Ok(())
}
