//! Built-in joke catalogue for fresh installs.
//!
//! The bot itself never inserts jokes; operators load this list with
//! `norrisbot seed` before the first start.

use crate::DbPool;

pub const JOKES: &[&str] = &[
    "Chuck Norris counted to infinity. Twice.",
    "Chuck Norris can divide by zero.",
    "Chuck Norris doesn't read books. He stares them down until he gets the information he wants.",
    "When Chuck Norris does a push-up, he isn't lifting himself up, he's pushing the Earth down.",
    "Chuck Norris can slam a revolving door.",
    "Chuck Norris' keyboard doesn't have a Ctrl key because nothing controls Chuck Norris.",
    "Chuck Norris doesn't need a debugger, he just stares down the bug until the code confesses.",
    "Chuck Norris can compile syntax errors.",
    "Chuck Norris once kicked a horse in the chin. Its descendants are known today as giraffes.",
    "Time waits for no man. Unless that man is Chuck Norris.",
    "Chuck Norris' programs never exit, they terminate.",
    "Chuck Norris can unit test entire applications with a single assert.",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub total: usize,
}

pub struct JokeSeed;

impl JokeSeed {
    /// Inserts the built-in catalogue when the `jokes` table is empty.
    /// A populated table is left untouched so usage counts survive.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, sqlx::Error> {
        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jokes").fetch_one(pool).await?;
        if existing > 0 {
            return Ok(SeedResult { inserted: 0, total: existing as usize });
        }

        let mut tx = pool.begin().await?;
        for joke in JOKES {
            sqlx::query("INSERT INTO jokes (joke, used) VALUES (?, 0)")
                .bind(*joke)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(SeedResult { inserted: JOKES.len(), total: JOKES.len() })
    }
}
