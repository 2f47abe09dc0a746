pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;
pub mod store;

pub use connection::{connect, connect_in_memory, connect_with_settings, DbPool};
pub use fixtures::{JokeSeed, SeedResult};
pub use repositories::{InfoRepository, JokeRepository, RepositoryError};
pub use store::{SqlStoreProvider, StaticStoreProvider, Store, StoreProvider};
