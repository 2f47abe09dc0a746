//! Bot controller - decides when NorrisBot speaks
//!
//! This crate holds the decision logic that sits between the Slack event
//! loop and the joke store:
//! - **Filters** (`filters`) - the four message predicates, evaluated in order
//! - **Controller** (`controller`) - connection lifecycle, first-run greeting,
//!   and reply-with-joke
//! - **Outcomes** (`outcome`) - what the controller did with each message
//!
//! # Flow
//!
//! 1. `hello` arrives: resolve the bot's own user, snapshot channels, open
//!    the store, run the first-run check
//! 2. every `message`: filters → least used joke → post → increment
//!
//! No failure ever leaves the event that caused it; a message that cannot
//! be answered simply gets no reply.

pub mod controller;
pub mod errors;
pub mod filters;
pub mod outcome;

pub use controller::{Controller, ControllerState, GREETING};
pub use errors::ControllerError;
pub use outcome::{FirstRunOutcome, ReplyOutcome, SkipReason};
