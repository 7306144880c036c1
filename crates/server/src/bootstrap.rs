use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use superclaw_channels::{ChannelDispatcher, RouteService};
use superclaw_core::config::{AppConfig, ConfigError, LoadOptions};
use superclaw_core::ratelimit::{RateLimiter, SystemClock};
use superclaw_db::repositories::{SqlAgentRepository, SqlUsageRepository, SqlUserRepository};
use superclaw_db::{connect, migrations, DbPool};
use superclaw_llm::{build_client, CompletionError};
use superclaw_router::{MessageRouter, RouteError, RouteReply, RouteRequest, UsageLedger};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub router: Arc<MessageRouter>,
    pub dispatcher: Arc<ChannelDispatcher>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("completion client setup failed: {0}")]
    Llm(#[from] CompletionError),
}

/// `MessageRouter` as seen by the channel dispatcher.
pub struct RouterRouteService {
    router: Arc<MessageRouter>,
}

impl RouterRouteService {
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl RouteService for RouterRouteService {
    async fn route(&self, request: RouteRequest) -> Result<RouteReply, RouteError> {
        self.router.route(request).await
    }
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let users = Arc::new(SqlUserRepository::new(db_pool.clone()));
    let agents = Arc::new(SqlAgentRepository::new(db_pool.clone()));
    let usage = Arc::new(SqlUsageRepository::new(db_pool.clone()));

    let ledger = UsageLedger::new(users.clone(), usage, config.quota.enforce_free_tier);
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit.to_limiter_config()));
    let completions = build_client(&config.llm)?;

    let router = Arc::new(MessageRouter::new(
        users,
        agents,
        ledger,
        rate_limiter,
        completions,
        Arc::new(SystemClock),
    ));
    let dispatcher = Arc::new(ChannelDispatcher::new(Arc::new(RouterRouteService::new(
        router.clone(),
    ))));

    info!(
        event_name = "system.bootstrap.ready",
        llm_provider = ?config.llm.provider,
        "routing stack wired"
    );

    Ok(Application { config, db_pool, router, dispatcher })
}

#[cfg(test)]
mod tests {
    use superclaw_core::config::{ConfigOverrides, LoadOptions};

    use crate::bootstrap::bootstrap;

    fn memory_options() -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:?cache=shared".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_applies_migrations_and_wires_the_router() {
        let app = bootstrap(memory_options()).await.expect("bootstrap");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type = 'table' AND name IN ('users', 'agents', 'message_usage')",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("schema query");
        assert_eq!(table_count, 3);

        app.db_pool.close().await;
    }

    #[tokio::test]
    async fn bootstrap_rejects_a_non_sqlite_database_url() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("postgres://localhost/superclaw".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }
}
