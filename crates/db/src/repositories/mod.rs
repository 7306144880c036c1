use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use superclaw_core::domain::{Agent, AgentId, Channel, User, UserId, UsageRecord};

pub mod agent;
pub mod memory;
pub mod usage;
pub mod user;

pub use agent::SqlAgentRepository;
pub use memory::{InMemoryAgentRepository, InMemoryUsageRepository, InMemoryUserRepository};
pub use usage::SqlUsageRepository;
pub use user::SqlUserRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Resolve a user by the identity a channel presents. Chat channels
    /// match their external-id column; `Api` treats the identity as the
    /// internal user id.
    async fn find_by_channel_identity(
        &self,
        channel: Channel,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError>;

    async fn save(&self, user: User) -> Result<(), RepositoryError>;

    /// Atomically bump the monthly counter in the store and return the
    /// post-increment value. Read-modify-write in application code would
    /// lose increments under concurrency.
    async fn increment_usage(&self, id: &UserId, now: DateTime<Utc>)
        -> Result<i64, RepositoryError>;

    async fn reset_usage(&self, id: &UserId, now: DateTime<Utc>) -> Result<(), RepositoryError>;

    /// Monthly batch reset for Starter/Pro/Agency. Free is excluded: its
    /// counter is a lifetime allowance.
    async fn reset_billable_usage(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}

#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError>;

    /// Agents eligible to receive messages (active or running), oldest
    /// first so selection stays deterministic.
    async fn list_dispatchable_for_user(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Agent>, RepositoryError>;

    async fn save(&self, agent: Agent) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    async fn append(&self, record: UsageRecord) -> Result<(), RepositoryError>;

    async fn count_for_period(
        &self,
        user_id: &UserId,
        period_start: DateTime<Utc>,
    ) -> Result<i64, RepositoryError>;

    async fn list_for_period(
        &self,
        user_id: &UserId,
        period_start: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>, RepositoryError>;
}

pub(crate) fn parse_timestamp(column: &str, value: String) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(&value).map(|timestamp| timestamp.with_timezone(&Utc)).map_err(
        |error| {
            RepositoryError::Decode(format!("invalid timestamp in `{column}`: `{value}` ({error})"))
        },
    )
}
