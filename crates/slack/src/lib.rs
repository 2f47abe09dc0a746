//! Slack integration - Real Time Messaging bot interface
//!
//! This crate provides the Slack side of norrisbot:
//! - **Events** (`events`) - RTM event model, parsing, and the handler seam
//! - **Client** (`client`) - `ChatClient` capability used by the bot
//! - **Web API** (`web`) - reqwest-backed `ChatClient` plus `rtm.connect`
//! - **Socket** (`socket`) - websocket transport and the serial event loop
//!
//! # Architecture
//!
//! ```text
//! Slack RTM websocket → RtmTransport → RtmRunner → EventHandler (bot)
//!                                                       ↓
//!                               Slack Web API ← ChatClient
//! ```
//!
//! # Key Types
//!
//! - `RtmRunner` - connects once and delivers events one at a time
//! - `SlackWebClient` - users, channels, and message posting
//! - `EventHandler` - lifecycle and message callbacks

pub mod client;
pub mod events;
pub mod socket;
pub mod web;

pub use client::{ChatClient, ClientError, SlackChannel, SlackUser};
pub use events::{EventContext, EventHandler, IncomingMessage, SlackEvent, SlackEventType};
pub use socket::{RtmRunner, RtmTransport, RunnerExit, TransportError, WebSocketTransport};
pub use web::SlackWebClient;
