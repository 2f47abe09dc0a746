use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::socket::TransportError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlackEvent {
    /// `hello`: the session is established.
    Connected,
    Message(IncomingMessage),
    /// `goodbye`: the platform is about to close the socket.
    Disconnect,
    Unsupported { event_type: String },
}

impl SlackEvent {
    pub fn event_type(&self) -> SlackEventType {
        match self {
            Self::Connected => SlackEventType::Connected,
            Self::Message(_) => SlackEventType::Message,
            Self::Disconnect => SlackEventType::Disconnect,
            Self::Unsupported { .. } => SlackEventType::Unsupported,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlackEventType {
    Connected,
    Message,
    Disconnect,
    Unsupported,
}

/// A channel message as delivered over RTM. Missing ids deserialize as empty
/// strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "channel", deserialize_with = "null_as_empty")]
    pub channel_id: String,
    #[serde(default, rename = "user", deserialize_with = "null_as_empty")]
    pub user_id: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

/// Receives lifecycle and message callbacks from the runner, one at a time.
#[async_trait]
pub trait EventHandler: Send {
    async fn on_connecting(&mut self);
    async fn on_connected(&mut self, ctx: &EventContext);
    async fn on_message(&mut self, message: &IncomingMessage, ctx: &EventContext);
    async fn on_connection_error(&mut self, error: &TransportError);
    async fn on_disconnected(&mut self);
}

#[derive(Deserialize)]
struct EventKind {
    #[serde(rename = "type", default)]
    event_type: Option<String>,
}

/// Parses one RTM frame. Frames without a `type` (send acknowledgements,
/// for instance) come back as `Unsupported`.
pub fn parse_event(raw: &str) -> Result<SlackEvent, TransportError> {
    let kind: EventKind = serde_json::from_str(raw)
        .map_err(|error| TransportError::Decode(format!("malformed rtm frame: {error}")))?;

    let event = match kind.event_type.as_deref() {
        Some("hello") => SlackEvent::Connected,
        Some("goodbye") => SlackEvent::Disconnect,
        Some("message") => {
            let message: IncomingMessage = serde_json::from_str(raw).map_err(|error| {
                TransportError::Decode(format!("malformed rtm message: {error}"))
            })?;
            SlackEvent::Message(message)
        }
        Some(other) => SlackEvent::Unsupported { event_type: other.to_owned() },
        None => SlackEvent::Unsupported { event_type: "untyped".to_owned() },
    };

    Ok(event)
}
