use async_trait::async_trait;
use chrono::Utc;
use norrisbot_core::config::BotConfig;
use norrisbot_core::{last_run_value, BotIdentity};
use norrisbot_db::{Store, StoreProvider};
use norrisbot_slack::{
    ChatClient, EventContext, EventHandler, IncomingMessage, SlackChannel, TransportError,
};
use tracing::{debug, error, info, warn, Instrument, Span};

use crate::errors::ControllerError;
use crate::filters;
use crate::outcome::{FirstRunOutcome, ReplyOutcome, SkipReason};

pub const GREETING: &str = "Hi guys, I am here to keep you entertained.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerState {
    Created,
    Connecting,
    Ready,
    Failed,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Connecting => "connecting",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// Owns the bot's view of the workspace (its own identity, the channel
/// snapshot, the store handle) and reacts to connection and message events.
///
/// Every piece of work runs inside the span handed to [`Controller::new`].
pub struct Controller<C, P> {
    client: C,
    store_provider: P,
    bot: BotConfig,
    span: Span,
    state: ControllerState,
    identity: Option<BotIdentity>,
    channels: Vec<SlackChannel>,
    store: Option<Store>,
}

impl<C, P> Controller<C, P>
where
    C: ChatClient,
    P: StoreProvider,
{
    pub fn new(client: C, store_provider: P, bot: BotConfig, span: Span) -> Self {
        Self {
            client,
            store_provider,
            bot,
            span,
            state: ControllerState::Created,
            identity: None,
            channels: Vec::new(),
            store: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn identity(&self) -> Option<&BotIdentity> {
        self.identity.as_ref()
    }

    pub fn channels(&self) -> &[SlackChannel] {
        &self.channels
    }

    /// Connecting → Ready: identity, channel snapshot, store, first-run check.
    pub async fn initialize(&mut self) -> FirstRunOutcome {
        let span = self.span.clone();
        async {
            self.identity = self.resolve_identity().await;
            self.channels = self.load_channels().await;
            self.store = self.open_store().await;
            self.state = ControllerState::Ready;
            info!(
                event_name = "bot.controller.ready",
                identity_resolved = self.identity.is_some(),
                channel_count = self.channels.len(),
                store_open = self.store.is_some(),
                "controller ready"
            );

            self.first_run_check().await
        }
        .instrument(span)
        .await
    }

    async fn resolve_identity(&self) -> Option<BotIdentity> {
        let users = match self.client.users().await {
            Ok(users) => users,
            Err(client_error) => {
                log_failure("resolve_identity", &client_error.into());
                return None;
            }
        };

        let identity = users.into_iter().find(|user| user.name == self.bot.name).map(|user| {
            BotIdentity { user_id: user.id, name: user.name }
        });
        match &identity {
            Some(identity) => info!(
                event_name = "bot.identity.resolved",
                user_id = %identity.user_id,
                bot_name = %identity.name,
                "resolved bot user"
            ),
            None => info!(
                event_name = "bot.identity.not_found",
                bot_name = %self.bot.name,
                "no workspace user matches the bot name; replies are disabled"
            ),
        }
        identity
    }

    async fn load_channels(&self) -> Vec<SlackChannel> {
        match self.client.channels().await {
            Ok(channels) => channels,
            Err(client_error) => {
                log_failure("load_channels", &client_error.into());
                Vec::new()
            }
        }
    }

    async fn open_store(&self) -> Option<Store> {
        match self.store_provider.open().await {
            Ok(store) => Some(store),
            Err(store_error) => {
                log_failure("open_store", &store_error.into());
                None
            }
        }
    }

    /// Greets the first channel on the very first start, otherwise refreshes
    /// the `lastrun` timestamp.
    pub async fn first_run_check(&self) -> FirstRunOutcome {
        let Some(store) = &self.store else {
            debug!(event_name = "bot.first_run.no_store", "store unavailable; skipping check");
            return FirstRunOutcome::Aborted;
        };

        let last_run = match store.info.last_run().await {
            Ok(last_run) => last_run,
            Err(store_error) => {
                log_failure("first_run_check", &store_error.into());
                return FirstRunOutcome::Aborted;
            }
        };
        let now = last_run_value(Utc::now());

        if let Some(previous) = last_run {
            if let Err(store_error) = store.info.update_last_run(&now).await {
                log_failure("update_last_run", &store_error.into());
                return FirstRunOutcome::Aborted;
            }
            info!(
                event_name = "bot.first_run.refreshed",
                previous = %previous,
                last_run = %now,
                "updated last run timestamp"
            );
            return FirstRunOutcome::Refreshed;
        }

        let Some(channel) = self.channels.first() else {
            warn!(
                event_name = "bot.first_run.deferred",
                "bot is not a member of any channel; greeting deferred to the next start"
            );
            return FirstRunOutcome::Deferred;
        };

        match self.client.post_message_to_channel(channel, GREETING).await {
            Ok(()) => info!(
                event_name = "bot.first_run.greeted",
                channel_id = %channel.id,
                channel_name = %channel.name,
                "posted first run greeting"
            ),
            Err(client_error) => log_failure("post_greeting", &client_error.into()),
        }

        if let Err(store_error) = store.info.insert_last_run(&now).await {
            log_failure("insert_last_run", &store_error.into());
            return FirstRunOutcome::Aborted;
        }
        FirstRunOutcome::Greeted
    }

    pub async fn handle_message(&self, message: &IncomingMessage) -> ReplyOutcome {
        if self.state != ControllerState::Ready {
            debug!(
                event_name = "bot.message.ignored",
                state = self.state.as_str(),
                "controller not ready"
            );
            return ReplyOutcome::Skipped(SkipReason::NotReady);
        }

        if let Err(reason) =
            filters::screen(message, &self.bot.name, self.identity.as_ref(), self.bot.reply_policy)
        {
            debug!(
                event_name = "bot.message.filtered",
                reason = reason.as_str(),
                channel_id = %message.channel_id,
                user_id = %message.user_id,
                "message did not pass filters"
            );
            return ReplyOutcome::Skipped(reason);
        }

        self.reply_with_joke(&message.channel_id).await
    }

    async fn reply_with_joke(&self, channel_id: &str) -> ReplyOutcome {
        let Some(store) = &self.store else {
            debug!(event_name = "bot.reply.no_store", "store unavailable; dropping message");
            return ReplyOutcome::Skipped(SkipReason::StoreUnavailable);
        };

        let joke = match store.jokes.least_used().await {
            Ok(Some(joke)) => joke,
            Ok(None) => {
                debug!(event_name = "bot.reply.no_jokes", "joke table is empty");
                return ReplyOutcome::Skipped(SkipReason::NoJokes);
            }
            Err(store_error) => {
                log_failure("select_joke", &store_error.into());
                return ReplyOutcome::Skipped(SkipReason::StoreQueryFailed);
            }
        };

        let Some(channel) = self.channels.iter().find(|channel| channel.id == channel_id) else {
            debug!(
                event_name = "bot.reply.unknown_channel",
                channel_id = %channel_id,
                "channel is not in the bot's channel list"
            );
            return ReplyOutcome::Skipped(SkipReason::UnknownChannel);
        };

        if let Err(client_error) = self.client.post_message_to_channel(channel, &joke.text).await {
            log_failure("post_joke", &client_error.into());
            return ReplyOutcome::Skipped(SkipReason::PostFailed);
        }

        if let Err(store_error) = store.jokes.increment_used(joke.id).await {
            log_failure("increment_used", &store_error.into());
        }
        info!(
            event_name = "bot.reply.sent",
            joke_id = %joke.id,
            channel_id = %channel.id,
            "posted joke"
        );

        ReplyOutcome::Replied { joke_id: joke.id, channel_id: channel.id.clone() }
    }
}

#[async_trait]
impl<C, P> EventHandler for Controller<C, P>
where
    C: ChatClient,
    P: StoreProvider,
{
    async fn on_connecting(&mut self) {
        self.state = ControllerState::Connecting;
        debug!(parent: &self.span, event_name = "bot.controller.connecting", "connecting to slack");
    }

    async fn on_connected(&mut self, ctx: &EventContext) {
        match self.state {
            ControllerState::Created | ControllerState::Connecting => {
                let outcome = self.initialize().await;
                debug!(
                    parent: &self.span,
                    event_name = "bot.controller.initialized",
                    correlation_id = %ctx.correlation_id,
                    first_run = ?outcome,
                    "connect sequence finished"
                );
            }
            ControllerState::Ready | ControllerState::Failed => {
                debug!(
                    parent: &self.span,
                    event_name = "bot.controller.duplicate_hello",
                    state = self.state.as_str(),
                    correlation_id = %ctx.correlation_id,
                    "ignoring connected event"
                );
            }
        }
    }

    async fn on_message(&mut self, message: &IncomingMessage, ctx: &EventContext) {
        let span = self.span.clone();
        let outcome = self.handle_message(message).instrument(span).await;
        debug!(
            parent: &self.span,
            event_name = "bot.message.handled",
            correlation_id = %ctx.correlation_id,
            outcome = ?outcome,
            "message handled"
        );
    }

    async fn on_connection_error(&mut self, transport_error: &TransportError) {
        self.state = ControllerState::Failed;
        let failure = ControllerError::from(transport_error.clone());
        self.span.in_scope(|| log_failure("connection", &failure));
    }

    async fn on_disconnected(&mut self) {
        info!(
            parent: &self.span,
            event_name = "bot.controller.disconnected",
            state = self.state.as_str(),
            "slack session ended"
        );
    }
}

fn log_failure(stage: &'static str, failure: &ControllerError) {
    if failure.is_severe() {
        error!(
            event_name = "bot.controller.failure",
            stage,
            kind = failure.kind(),
            connection = failure.is_connection(),
            error = %failure,
            "controller operation failed"
        );
    } else {
        warn!(
            event_name = "bot.controller.failure",
            stage,
            kind = failure.kind(),
            error = %failure,
            "slack call failed"
        );
    }
}
