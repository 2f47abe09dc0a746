use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use norrisbot_core::domain::joke::{Joke, JokeId};

use super::{InfoRepository, JokeRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryInfoRepository {
    last_run: RwLock<Option<String>>,
}

impl InMemoryInfoRepository {
    pub fn with_last_run(value: impl Into<String>) -> Self {
        Self { last_run: RwLock::new(Some(value.into())) }
    }
}

#[async_trait::async_trait]
impl InfoRepository for InMemoryInfoRepository {
    async fn last_run(&self) -> Result<Option<String>, RepositoryError> {
        Ok(self.last_run.read().await.clone())
    }

    async fn insert_last_run(&self, value: &str) -> Result<(), RepositoryError> {
        let mut last_run = self.last_run.write().await;
        if last_run.is_some() {
            return Err(RepositoryError::Decode("lastrun row already exists".to_string()));
        }
        *last_run = Some(value.to_string());
        Ok(())
    }

    async fn update_last_run(&self, value: &str) -> Result<(), RepositoryError> {
        let mut last_run = self.last_run.write().await;
        if last_run.is_some() {
            *last_run = Some(value.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryJokeRepository {
    jokes: RwLock<BTreeMap<JokeId, Joke>>,
}

impl InMemoryJokeRepository {
    pub fn with_jokes(jokes: impl IntoIterator<Item = Joke>) -> Self {
        Self { jokes: RwLock::new(jokes.into_iter().map(|joke| (joke.id, joke)).collect()) }
    }

    pub async fn snapshot(&self) -> Vec<Joke> {
        self.jokes.read().await.values().cloned().collect()
    }
}

#[async_trait::async_trait]
impl JokeRepository for InMemoryJokeRepository {
    async fn least_used(&self) -> Result<Option<Joke>, RepositoryError> {
        let jokes = self.jokes.read().await;
        let Some(lowest) = jokes.values().map(|joke| joke.used_count).min() else {
            return Ok(None);
        };

        let candidates =
            jokes.values().filter(|joke| joke.used_count == lowest).collect::<Vec<_>>();
        Ok(candidates.choose(&mut rand::thread_rng()).map(|joke| (*joke).clone()))
    }

    async fn increment_used(&self, id: JokeId) -> Result<(), RepositoryError> {
        if let Some(joke) = self.jokes.write().await.get_mut(&id) {
            joke.used_count += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use norrisbot_core::domain::joke::{Joke, JokeId};

    use crate::repositories::{
        InMemoryInfoRepository, InMemoryJokeRepository, InfoRepository, JokeRepository,
    };

    fn joke(id: i64, used_count: i64) -> Joke {
        Joke { id: JokeId(id), text: format!("J{id}"), used_count }
    }

    #[tokio::test]
    async fn in_memory_info_keeps_a_single_last_run() {
        let repo = InMemoryInfoRepository::default();
        assert_eq!(repo.last_run().await.expect("read"), None);

        repo.insert_last_run("first").await.expect("insert");
        assert!(repo.insert_last_run("second").await.is_err(), "duplicate insert is rejected");

        repo.update_last_run("third").await.expect("update");
        assert_eq!(repo.last_run().await.expect("read").as_deref(), Some("third"));
    }

    #[tokio::test]
    async fn in_memory_jokes_follow_usage_order() {
        let repo = InMemoryJokeRepository::with_jokes([joke(1, 2), joke(2, 0), joke(3, 1)]);

        assert_eq!(repo.least_used().await.expect("read").map(|joke| joke.id), Some(JokeId(2)));
        repo.increment_used(JokeId(2)).await.expect("increment");
        repo.increment_used(JokeId(2)).await.expect("increment");
        assert_eq!(repo.least_used().await.expect("read").map(|joke| joke.id), Some(JokeId(3)));
    }

    #[tokio::test]
    async fn in_memory_jokes_empty_catalogue_yields_nothing() {
        let repo = InMemoryJokeRepository::default();
        assert_eq!(repo.least_used().await.expect("read"), None);
    }
}
