//! Message predicates. Each one is pure and side-effect free; `screen`
//! applies them in order and stops at the first that fails.

use norrisbot_core::{BotIdentity, ReplyPolicy};
use norrisbot_slack::IncomingMessage;

use crate::outcome::SkipReason;

pub const TRIGGER_PHRASE: &str = "chuck norris";
const MESSAGE_EVENT: &str = "message";

pub fn is_chat_message(message: &IncomingMessage) -> bool {
    message.event_type == MESSAGE_EVENT
        && message.text.as_deref().is_some_and(|text| !text.is_empty())
}

/// Public channel ids start with `C`; direct messages and groups do not.
pub fn is_channel_conversation(channel_id: &str) -> bool {
    channel_id.starts_with('C')
}

pub fn is_mentioning(text: &str, bot_name: &str) -> bool {
    let text = text.to_lowercase();
    if text.contains(TRIGGER_PHRASE) {
        return true;
    }

    let name = bot_name.trim().to_lowercase();
    !name.is_empty() && text.contains(&name)
}

/// Without a resolved identity the bot cannot tell its own messages apart,
/// so nothing is eligible.
pub fn is_author_eligible(
    user_id: &str,
    identity: Option<&BotIdentity>,
    policy: ReplyPolicy,
) -> bool {
    let Some(identity) = identity else {
        return false;
    };
    if user_id.is_empty() {
        return false;
    }

    match policy {
        ReplyPolicy::Others => !identity.is_author_of(user_id),
        ReplyPolicy::SelfOnly => identity.is_author_of(user_id),
    }
}

pub fn screen(
    message: &IncomingMessage,
    bot_name: &str,
    identity: Option<&BotIdentity>,
    policy: ReplyPolicy,
) -> Result<(), SkipReason> {
    if !is_chat_message(message) {
        return Err(SkipReason::NotChatMessage);
    }
    if !is_channel_conversation(&message.channel_id) {
        return Err(SkipReason::NotChannelConversation);
    }
    if !is_mentioning(message.text.as_deref().unwrap_or_default(), bot_name) {
        return Err(SkipReason::NotMentioned);
    }
    if !is_author_eligible(&message.user_id, identity, policy) {
        return Err(SkipReason::AuthorNotEligible);
    }
    Ok(())
}
