use std::sync::Arc;
use std::time::Duration;

use norrisbot_bot::Controller;
use norrisbot_core::config::{AppConfig, ConfigError};
use norrisbot_db::SqlStoreProvider;
use norrisbot_slack::{ClientError, RtmRunner, SlackWebClient, WebSocketTransport};
use thiserror::Error;
use tracing::info;

const SLACK_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub type BotController = Controller<SlackWebClient, SqlStoreProvider>;
pub type BotRunner = RtmRunner<BotController>;

pub struct Application {
    pub config: AppConfig,
    pub runner: BotRunner,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("slack client setup failed: {0}")]
    SlackClient(#[source] ClientError),
}

/// Wires the Slack client, the store provider and the controller. Nothing
/// touches the network or the database until the runner is started.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        bot_name = %config.bot.name,
        reply_policy = ?config.bot.reply_policy,
        "starting application bootstrap"
    );

    let web = SlackWebClient::new(
        &config.slack.api_base,
        config.slack.api_token.clone(),
        SLACK_REQUEST_TIMEOUT,
    )
    .map_err(BootstrapError::SlackClient)?;

    let store_provider = SqlStoreProvider::new(
        config.database.path.clone(),
        config.database.max_connections,
        config.database.timeout_secs,
    );
    let span = tracing::info_span!("norrisbot", bot_name = %config.bot.name);
    let controller = Controller::new(web.clone(), store_provider, config.bot.clone(), span);
    let transport = Arc::new(WebSocketTransport::new(web));

    info!(
        event_name = "system.bootstrap.ready",
        db_path = %config.database.path.display(),
        "application wired"
    );

    Ok(Application { config, runner: RtmRunner::new(transport, controller) })
}
