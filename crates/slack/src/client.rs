use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackUser {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("slack request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("slack {method} failed: {error}")]
    Api { method: String, error: String },
}

/// What the bot needs from the messaging platform once connected.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Every user of the workspace, in platform order.
    async fn users(&self) -> Result<Vec<SlackUser>, ClientError>;

    /// Public channels the bot is a member of, in platform order.
    async fn channels(&self) -> Result<Vec<SlackChannel>, ClientError>;

    /// Posts `text` to `channel` as the bot user.
    async fn post_message_to_channel(
        &self,
        channel: &SlackChannel,
        text: &str,
    ) -> Result<(), ClientError>;
}
