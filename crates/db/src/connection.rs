use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub type DbPool = sqlx::SqlitePool;

pub async fn connect(path: &Path) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(path, 1, 30).await
}

/// Opens the store at `path`, creating the file and its parent directory
/// when they do not exist yet.
pub async fn connect_with_settings(
    path: &Path,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    pool_options(max_connections, timeout_secs).connect_with(options).await
}

/// Single-connection in-memory store; every pooled connection would
/// otherwise see its own empty database.
pub async fn connect_in_memory() -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
    pool_options(1, 30).connect_with(options).await
}

fn pool_options(max_connections: u32, timeout_secs: u64) -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::connect_with_settings;

    #[tokio::test]
    async fn creates_missing_parent_directory_and_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("data").join("norrisbot.db");

        let pool = connect_with_settings(&path, 1, 5).await.expect("connect");
        sqlx::query("SELECT 1").execute(&pool).await.expect("query");
        pool.close().await;

        assert!(path.exists(), "store file should be created on first open");
    }
}
