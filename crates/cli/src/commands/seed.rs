use crate::commands::{open_migrated, prepare, CommandResult};
use norrisbot_db::{JokeSeed, SeedResult};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = open_migrated(&config).await?;
        let seeded = JokeSeed::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8));
        pool.close().await;
        seeded
    });

    match result {
        Ok(seed) => CommandResult::success("seed", seed_message(&seed)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn seed_message(seed: &SeedResult) -> String {
    if seed.inserted == 0 {
        format!("jokes table already holds {} jokes; nothing inserted", seed.total)
    } else {
        format!("seeded {} jokes", seed.inserted)
    }
}

#[cfg(test)]
mod tests {
    use norrisbot_db::SeedResult;

    use super::seed_message;

    #[test]
    fn message_reports_inserted_jokes() {
        assert_eq!(seed_message(&SeedResult { inserted: 12, total: 12 }), "seeded 12 jokes");
    }

    #[test]
    fn message_reports_untouched_table() {
        assert_eq!(
            seed_message(&SeedResult { inserted: 0, total: 40 }),
            "jokes table already holds 40 jokes; nothing inserted"
        );
    }
}
