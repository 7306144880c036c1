use chrono::Utc;

use superclaw_db::repositories::{SqlUserRepository, UserRepository};

use crate::commands::{self, CommandResult};

/// Monthly counter reset for billable tiers. Free users keep their
/// counter: theirs is a lifetime allowance, not a monthly one.
pub fn run() -> CommandResult {
    let config = match commands::load_config("usage-reset") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let result = commands::block_on("usage-reset", async {
        let pool = commands::open_migrated_pool("usage-reset", &config).await?;

        let users = SqlUserRepository::new(pool.clone());
        let reset = users.reset_billable_usage(Utc::now()).await.map_err(|error| {
            CommandResult::failure("usage-reset", "usage_reset", error.to_string(), 6)
        })?;

        pool.close().await;
        Ok(reset)
    });

    match result {
        Ok(reset) => CommandResult::success(
            "usage-reset",
            format!("reset monthly counters for {reset} billable users"),
        ),
        Err(result) => result,
    }
}
