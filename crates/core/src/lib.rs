pub mod config;
pub mod domain;

pub use config::{AppConfig, ConfigError, LoadOptions, ReplyPolicy};
pub use domain::identity::BotIdentity;
pub use domain::info::{last_run_value, LAST_RUN_KEY};
pub use domain::joke::{Joke, JokeId};
