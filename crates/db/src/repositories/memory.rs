//! In-memory repository doubles for service-level tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use superclaw_core::domain::{Agent, AgentId, Channel, User, UserId, UsageRecord};

use super::{AgentRepository, RepositoryError, UsageRepository, UserRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, User>>,
    fail_next_increment: AtomicBool,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for the next `increment_usage` call to fail, to exercise
    /// the "completion succeeded but recording failed" path.
    pub fn fail_next_increment(&self) {
        self.fail_next_increment.store(true, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.lock().await.get(id.as_str()).cloned())
    }

    async fn find_by_channel_identity(
        &self,
        channel: Channel,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let users = self.users.lock().await;
        let found = users.values().find(|user| match channel {
            Channel::Api => user.id.as_str() == external_id,
            _ => user.external_id(channel) == Some(external_id),
        });
        Ok(found.cloned())
    }

    async fn save(&self, user: User) -> Result<(), RepositoryError> {
        self.users.lock().await.insert(user.id.0.clone(), user);
        Ok(())
    }

    async fn increment_usage(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        if self.fail_next_increment.swap(false, Ordering::SeqCst) {
            return Err(RepositoryError::Decode("injected increment failure".to_owned()));
        }

        let mut users = self.users.lock().await;
        let user = users
            .get_mut(id.as_str())
            .ok_or_else(|| RepositoryError::Database(sqlx::Error::RowNotFound))?;
        user.messages_this_month += 1;
        user.updated_at = now;
        Ok(user.messages_this_month)
    }

    async fn reset_usage(&self, id: &UserId, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if let Some(user) = users.get_mut(id.as_str()) {
            user.messages_this_month = 0;
            user.updated_at = now;
        }
        Ok(())
    }

    async fn reset_billable_usage(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut users = self.users.lock().await;
        let mut reset = 0;
        for user in users.values_mut() {
            if user.tier.is_billable() {
                user.messages_this_month = 0;
                user.updated_at = now;
                reset += 1;
            }
        }
        Ok(reset)
    }
}

#[derive(Default)]
pub struct InMemoryAgentRepository {
    agents: Mutex<Vec<Agent>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.agents.lock().await.iter().find(|agent| &agent.id == id).cloned())
    }

    async fn list_dispatchable_for_user(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Agent>, RepositoryError> {
        let mut matching: Vec<Agent> = self
            .agents
            .lock()
            .await
            .iter()
            .filter(|agent| &agent.owner_id == owner_id && agent.status.is_dispatchable())
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));
        Ok(matching)
    }

    async fn save(&self, agent: Agent) -> Result<(), RepositoryError> {
        let mut agents = self.agents.lock().await;
        if let Some(existing) = agents.iter_mut().find(|candidate| candidate.id == agent.id) {
            *existing = agent;
        } else {
            agents.push(agent);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUsageRepository {
    records: Mutex<Vec<UsageRecord>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<UsageRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn append(&self, record: UsageRecord) -> Result<(), RepositoryError> {
        self.records.lock().await.push(record);
        Ok(())
    }

    async fn count_for_period(
        &self,
        user_id: &UserId,
        period_start: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|record| &record.user_id == user_id && record.period_start == period_start)
            .count() as i64)
    }

    async fn list_for_period(
        &self,
        user_id: &UserId,
        period_start: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records
            .iter()
            .filter(|record| &record.user_id == user_id && record.period_start == period_start)
            .cloned()
            .collect())
    }
}
