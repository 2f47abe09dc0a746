use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::repositories::{
    InMemoryInfoRepository, InMemoryJokeRepository, InfoRepository, JokeRepository,
    RepositoryError, SqlInfoRepository, SqlJokeRepository,
};
use crate::{connect_with_settings, migrations};

/// Handles to both tables, shared by whoever owns the store.
#[derive(Clone)]
pub struct Store {
    pub info: Arc<dyn InfoRepository>,
    pub jokes: Arc<dyn JokeRepository>,
}

impl Store {
    pub fn new(info: Arc<dyn InfoRepository>, jokes: Arc<dyn JokeRepository>) -> Self {
        Self { info, jokes }
    }

    pub fn in_memory(info: InMemoryInfoRepository, jokes: InMemoryJokeRepository) -> Self {
        Self { info: Arc::new(info), jokes: Arc::new(jokes) }
    }
}

/// Opens the store once the bot is connected.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    async fn open(&self) -> Result<Store, RepositoryError>;
}

pub struct SqlStoreProvider {
    path: PathBuf,
    max_connections: u32,
    timeout_secs: u64,
}

impl SqlStoreProvider {
    pub fn new(path: impl Into<PathBuf>, max_connections: u32, timeout_secs: u64) -> Self {
        Self { path: path.into(), max_connections, timeout_secs }
    }
}

#[async_trait]
impl StoreProvider for SqlStoreProvider {
    async fn open(&self) -> Result<Store, RepositoryError> {
        let pool =
            connect_with_settings(&self.path, self.max_connections, self.timeout_secs).await?;
        migrations::run_pending(&pool).await?;
        info!(
            event_name = "store.opened",
            path = %self.path.display(),
            max_connections = self.max_connections,
            "joke store opened"
        );

        Ok(Store::new(
            Arc::new(SqlInfoRepository::new(pool.clone())),
            Arc::new(SqlJokeRepository::new(pool)),
        ))
    }
}

/// Hands out an already built store; used by tests and embedders.
pub struct StaticStoreProvider {
    store: Store,
}

impl StaticStoreProvider {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreProvider for StaticStoreProvider {
    async fn open(&self) -> Result<Store, RepositoryError> {
        Ok(self.store.clone())
    }
}
