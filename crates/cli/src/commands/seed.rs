use superclaw_db::seed_demo_data;

use crate::commands::{self, CommandResult};

pub fn run() -> CommandResult {
    let config = match commands::load_config("seed") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let result = commands::block_on("seed", async {
        let pool = commands::open_migrated_pool("seed", &config).await?;
        let summary = seed_demo_data(&pool).await.map_err(|error| {
            CommandResult::failure("seed", "seed_execution", error.to_string(), 6)
        })?;
        pool.close().await;
        Ok(summary)
    });

    match result {
        Ok(summary) => {
            let verb = if summary.created { "created" } else { "already present" };
            CommandResult::success(
                "seed",
                format!(
                    "demo dataset {verb}: user {} with {} agents",
                    summary.user_id,
                    summary.agent_ids.len()
                ),
            )
        }
        Err(result) => result,
    }
}
