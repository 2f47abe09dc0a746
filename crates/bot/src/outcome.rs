use norrisbot_core::JokeId;

/// Why a message did not get a joke.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotReady,
    NotChatMessage,
    NotChannelConversation,
    NotMentioned,
    AuthorNotEligible,
    StoreUnavailable,
    StoreQueryFailed,
    NoJokes,
    UnknownChannel,
    PostFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "not_ready",
            Self::NotChatMessage => "not_chat_message",
            Self::NotChannelConversation => "not_channel_conversation",
            Self::NotMentioned => "not_mentioned",
            Self::AuthorNotEligible => "author_not_eligible",
            Self::StoreUnavailable => "store_unavailable",
            Self::StoreQueryFailed => "store_query_failed",
            Self::NoJokes => "no_jokes",
            Self::UnknownChannel => "unknown_channel",
            Self::PostFailed => "post_failed",
        }
    }

    /// Set when the message was rejected before any store or Slack call.
    pub fn is_filtered(&self) -> bool {
        matches!(
            self,
            Self::NotReady
                | Self::NotChatMessage
                | Self::NotChannelConversation
                | Self::NotMentioned
                | Self::AuthorNotEligible
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplyOutcome {
    Replied { joke_id: JokeId, channel_id: String },
    Skipped(SkipReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FirstRunOutcome {
    /// Empty `info` table: greeting attempted and `lastrun` inserted.
    Greeted,
    /// Empty `info` table but no channel to greet; nothing written.
    Deferred,
    /// `lastrun` already present and refreshed.
    Refreshed,
    Aborted,
}
