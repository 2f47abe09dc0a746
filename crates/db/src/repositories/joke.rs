use sqlx::Row;

use norrisbot_core::domain::joke::{Joke, JokeId};

use super::{JokeRepository, RepositoryError};
use crate::DbPool;

pub struct SqlJokeRepository {
    pool: DbPool,
}

impl SqlJokeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_joke(row: &sqlx::sqlite::SqliteRow) -> Result<Joke, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let text: Option<String> =
        row.try_get("joke").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let used: Option<i64> =
        row.try_get("used").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Joke { id: JokeId(id), text: text.unwrap_or_default(), used_count: used.unwrap_or(0) })
}

#[async_trait::async_trait]
impl JokeRepository for SqlJokeRepository {
    async fn least_used(&self) -> Result<Option<Joke>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, joke, used FROM jokes ORDER BY COALESCE(used, 0) ASC, RANDOM() LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_joke(r)?)),
            None => Ok(None),
        }
    }

    async fn increment_used(&self, id: JokeId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE jokes SET used = COALESCE(used, 0) + 1 WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use norrisbot_core::domain::joke::JokeId;

    use super::SqlJokeRepository;
    use crate::repositories::JokeRepository;
    use crate::{connect_in_memory, migrations, DbPool};

    async fn pool_with_jokes(jokes: &[(i64, &str, i64)]) -> DbPool {
        let pool = connect_in_memory().await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        for (id, text, used) in jokes {
            sqlx::query("INSERT INTO jokes (id, joke, used) VALUES (?, ?, ?)")
                .bind(id)
                .bind(text)
                .bind(used)
                .execute(&pool)
                .await
                .expect("insert joke");
        }
        pool
    }

    #[tokio::test]
    async fn least_used_prefers_the_lowest_usage_count() {
        let pool = pool_with_jokes(&[(1, "J1", 4), (2, "J2", 1), (3, "J3", 9)]).await;
        let repo = SqlJokeRepository::new(pool);

        for _ in 0..10 {
            let joke = repo.least_used().await.expect("query").expect("a joke");
            assert_eq!(joke.id, JokeId(2));
            assert_eq!(joke.text, "J2");
        }
    }

    #[tokio::test]
    async fn least_used_breaks_ties_randomly() {
        let repo = SqlJokeRepository::new(pool_with_jokes(&[(1, "J1", 0), (2, "J2", 0)]).await);

        let mut seen = HashSet::new();
        for _ in 0..64 {
            seen.insert(repo.least_used().await.expect("query").expect("a joke").id);
        }
        assert_eq!(seen.len(), 2, "both equally used jokes should be picked at some point");
    }

    #[tokio::test]
    async fn least_used_is_none_for_an_empty_catalogue() {
        let repo = SqlJokeRepository::new(pool_with_jokes(&[]).await);
        assert_eq!(repo.least_used().await.expect("query"), None);
    }

    #[tokio::test]
    async fn increment_only_touches_the_given_joke() {
        let pool = pool_with_jokes(&[(1, "J1", 0), (2, "J2", 0)]).await;
        let repo = SqlJokeRepository::new(pool.clone());

        repo.increment_used(JokeId(2)).await.expect("increment");
        repo.increment_used(JokeId(2)).await.expect("increment");

        let counts: Vec<(i64, i64)> = sqlx::query_as("SELECT id, used FROM jokes ORDER BY id")
            .fetch_all(&pool)
            .await
            .expect("counts");
        assert_eq!(counts, vec![(1, 0), (2, 2)]);
    }
}
