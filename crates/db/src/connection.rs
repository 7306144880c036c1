use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

use superclaw_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Open the pool described by the `[database]` config section.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&config.url, config.max_connections, config.timeout_secs).await
}

/// Pool construction with explicit settings; tests use this directly.
///
/// The SQLite busy handler gets the same budget as pool acquisition so
/// a locked writer degrades into a wait instead of an immediate error.
pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    let timeout_secs = timeout_secs.max(1);
    let busy_timeout_ms = timeout_secs.min(60) * 1_000;
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query(&format!("PRAGMA busy_timeout = {busy_timeout_ms}"))
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

#[cfg(test)]
mod tests {
    use superclaw_core::config::DatabaseConfig;

    use super::connect;

    #[tokio::test]
    async fn connect_applies_the_configured_settings() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 2,
            timeout_secs: 7,
        };

        let pool = connect(&config).await.expect("connect");

        let (busy_timeout,): (i64,) =
            sqlx::query_as("PRAGMA busy_timeout").fetch_one(&pool).await.expect("busy_timeout");
        assert_eq!(busy_timeout, 7_000);
        let (foreign_keys,): (i64,) =
            sqlx::query_as("PRAGMA foreign_keys").fetch_one(&pool).await.expect("foreign_keys");
        assert_eq!(foreign_keys, 1);

        pool.close().await;
    }
}
