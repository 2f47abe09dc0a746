use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use crate::events::{parse_event, EventContext, EventHandler, SlackEvent};
use crate::web::SlackWebClient;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    /// A frame arrived but could not be decoded; the session is unaffected.
    #[error("undecodable rtm frame: {0}")]
    Decode(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[async_trait]
pub trait RtmTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    /// Next platform event, or `None` once the stream has closed.
    async fn next_event(&self) -> Result<Option<SlackEvent>, TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// RTM session over a websocket opened through `rtm.connect`.
pub struct WebSocketTransport {
    web: SlackWebClient,
    stream: Mutex<Option<WsStream>>,
}

impl WebSocketTransport {
    pub fn new(web: SlackWebClient) -> Self {
        Self { web, stream: Mutex::new(None) }
    }
}

#[async_trait]
impl RtmTransport for WebSocketTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        let url = self
            .web
            .rtm_connect()
            .await
            .map_err(|error| TransportError::Connect(error.to_string()))?;
        let (stream, _response) = connect_async(url.as_str())
            .await
            .map_err(|error| TransportError::Connect(error.to_string()))?;
        *self.stream.lock().await = Some(stream);
        Ok(())
    }

    async fn next_event(&self) -> Result<Option<SlackEvent>, TransportError> {
        let mut guard = self.stream.lock().await;
        let Some(stream) = guard.as_mut() else {
            return Err(TransportError::Receive("transport is not connected".to_owned()));
        };

        loop {
            let Some(frame) = stream.next().await else {
                return Ok(None);
            };
            match frame.map_err(|error| TransportError::Receive(error.to_string()))? {
                WsMessage::Text(text) => return parse_event(text.as_str()).map(Some),
                WsMessage::Binary(bytes) => {
                    let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                        TransportError::Decode("invalid utf-8 rtm payload".to_owned())
                    })?;
                    return parse_event(&text).map(Some);
                }
                WsMessage::Close(_) => return Ok(None),
                WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => continue,
            }
        }
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        let Some(mut stream) = self.stream.lock().await.take() else {
            return Ok(());
        };
        stream.close(None).await.map_err(|error| TransportError::Disconnect(error.to_string()))
    }
}

/// Why the runner stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunnerExit {
    ConnectFailed,
    ReceiveFailed,
    Closed,
}

/// Connects once and feeds events to the handler strictly one after
/// another: the next event is not read until the handler has returned.
/// There is no reconnect; a lost session ends the run.
pub struct RtmRunner<H> {
    transport: Arc<dyn RtmTransport>,
    handler: H,
}

impl<H> RtmRunner<H>
where
    H: EventHandler,
{
    pub fn new(transport: Arc<dyn RtmTransport>, handler: H) -> Self {
        Self { transport, handler }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub async fn start(&mut self) -> RunnerExit {
        self.handler.on_connecting().await;
        info!(event_name = "transport.rtm.connecting", "opening rtm transport connection");

        if let Err(transport_error) = self.transport.connect().await {
            error!(
                event_name = "transport.rtm.connect_failed",
                error = %transport_error,
                "rtm transport failed to connect; not reconnecting"
            );
            self.handler.on_connection_error(&transport_error).await;
            return RunnerExit::ConnectFailed;
        }
        info!(event_name = "transport.rtm.connected", "rtm transport connected");

        let mut sequence: u64 = 0;
        loop {
            let event = match self.transport.next_event().await {
                Ok(Some(event)) => event,
                Ok(None) => {
                    info!(event_name = "transport.rtm.closed", "rtm stream closed");
                    self.close().await;
                    return RunnerExit::Closed;
                }
                Err(TransportError::Decode(detail)) => {
                    warn!(
                        event_name = "transport.rtm.frame_dropped",
                        error = %detail,
                        "dropping undecodable rtm frame"
                    );
                    continue;
                }
                Err(transport_error) => {
                    error!(
                        event_name = "transport.rtm.receive_failed",
                        error = %transport_error,
                        "rtm transport read failed; not reconnecting"
                    );
                    self.handler.on_connection_error(&transport_error).await;
                    self.disconnect_quietly().await;
                    return RunnerExit::ReceiveFailed;
                }
            };

            sequence += 1;
            let context = EventContext { correlation_id: format!("rtm-{sequence}") };
            debug!(
                event_name = "ingress.slack.event_received",
                event_type = ?event.event_type(),
                correlation_id = %context.correlation_id,
                "received slack event"
            );

            match event {
                SlackEvent::Connected => self.handler.on_connected(&context).await,
                SlackEvent::Message(message) => self.handler.on_message(&message, &context).await,
                SlackEvent::Disconnect => {
                    info!(
                        event_name = "transport.rtm.goodbye",
                        correlation_id = %context.correlation_id,
                        "platform requested disconnect"
                    );
                    self.close().await;
                    return RunnerExit::Closed;
                }
                SlackEvent::Unsupported { .. } => {}
            }
        }
    }

    async fn close(&mut self) {
        self.disconnect_quietly().await;
        self.handler.on_disconnected().await;
    }

    async fn disconnect_quietly(&self) {
        if let Err(transport_error) = self.transport.disconnect().await {
            warn!(
                event_name = "transport.rtm.disconnect_failed",
                error = %transport_error,
                "failed to close rtm transport"
            );
        }
    }
}
