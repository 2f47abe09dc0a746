use norrisbot_core::domain::info::LAST_RUN_KEY;

use super::{InfoRepository, RepositoryError};
use crate::DbPool;

pub struct SqlInfoRepository {
    pool: DbPool,
}

impl SqlInfoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl InfoRepository for SqlInfoRepository {
    async fn last_run(&self) -> Result<Option<String>, RepositoryError> {
        let value: Option<Option<String>> =
            sqlx::query_scalar("SELECT val FROM info WHERE name = ? LIMIT 1")
                .bind(LAST_RUN_KEY)
                .fetch_optional(&self.pool)
                .await?;

        // A row with a NULL value still marks a previous run.
        Ok(value.map(Option::unwrap_or_default))
    }

    async fn insert_last_run(&self, value: &str) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO info (name, val) VALUES (?, ?)")
            .bind(LAST_RUN_KEY)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_last_run(&self, value: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE info SET val = ? WHERE name = ?")
            .bind(value)
            .bind(LAST_RUN_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SqlInfoRepository;
    use crate::repositories::InfoRepository;
    use crate::{connect_in_memory, migrations, DbPool};

    async fn migrated_pool() -> DbPool {
        let pool = connect_in_memory().await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        pool
    }

    #[tokio::test]
    async fn last_run_is_absent_on_a_fresh_store() {
        let repo = SqlInfoRepository::new(migrated_pool().await);
        assert_eq!(repo.last_run().await.expect("query"), None);
    }

    #[tokio::test]
    async fn update_overwrites_value_without_adding_rows() {
        let pool = migrated_pool().await;
        let repo = SqlInfoRepository::new(pool.clone());

        repo.insert_last_run("2026-10-17T09:00:00.000Z").await.expect("insert");
        repo.update_last_run("2026-10-18T09:00:00.000Z").await.expect("update");

        assert_eq!(
            repo.last_run().await.expect("query").as_deref(),
            Some("2026-10-18T09:00:00.000Z")
        );
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM info WHERE name = 'lastrun'")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn failing_query_surfaces_as_database_error() {
        let pool = connect_in_memory().await.expect("connect");
        let repo = SqlInfoRepository::new(pool);

        let error = repo.last_run().await.expect_err("info table is missing");
        assert!(matches!(error, crate::RepositoryError::Database(_)));
    }
}
