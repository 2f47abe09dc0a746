use async_trait::async_trait;
use thiserror::Error;

use norrisbot_core::domain::joke::{Joke, JokeId};

pub mod info;
pub mod joke;
pub mod memory;

pub use info::SqlInfoRepository;
pub use joke::SqlJokeRepository;
pub use memory::{InMemoryInfoRepository, InMemoryJokeRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Startup bookkeeping kept in the `info` table.
#[async_trait]
pub trait InfoRepository: Send + Sync {
    async fn last_run(&self) -> Result<Option<String>, RepositoryError>;
    async fn insert_last_run(&self, value: &str) -> Result<(), RepositoryError>;
    async fn update_last_run(&self, value: &str) -> Result<(), RepositoryError>;
}

/// Read access to the joke catalogue plus the usage counter.
#[async_trait]
pub trait JokeRepository: Send + Sync {
    /// One of the jokes with the lowest usage count, picked at random among ties.
    async fn least_used(&self) -> Result<Option<Joke>, RepositoryError>;
    async fn increment_used(&self, id: JokeId) -> Result<(), RepositoryError>;
}
