use serde::{Deserialize, Serialize};

/// The platform user record that represents the bot itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotIdentity {
    pub user_id: String,
    pub name: String,
}

impl BotIdentity {
    pub fn is_author_of(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
