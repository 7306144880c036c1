//! Demo seed data for local development and smoke tests.

use chrono::{Duration, Utc};
use serde::Serialize;

use superclaw_core::domain::{Agent, AgentPersona, SubscriptionTier, User};

use crate::repositories::{
    AgentRepository, RepositoryError, SqlAgentRepository, SqlUserRepository, UserRepository,
};
use crate::DbPool;

const DEMO_EMAIL: &str = "demo@superclaw.dev";

#[derive(Clone, Debug, Serialize)]
pub struct SeedSummary {
    pub user_id: String,
    pub agent_ids: Vec<String>,
    pub created: bool,
}

/// Insert a demo Starter user with one agent per common persona. Safe to
/// run repeatedly; an existing demo user short-circuits.
pub async fn seed_demo_data(pool: &DbPool) -> Result<SeedSummary, RepositoryError> {
    let users = SqlUserRepository::new(pool.clone());
    let agents = SqlAgentRepository::new(pool.clone());
    let now = Utc::now();

    if let Some(existing) = users
        .find_by_channel_identity(superclaw_core::domain::Channel::Telegram, "demo-telegram")
        .await?
    {
        let existing_agents = agents.list_dispatchable_for_user(&existing.id).await?;
        return Ok(SeedSummary {
            user_id: existing.id.0,
            agent_ids: existing_agents.into_iter().map(|agent| agent.id.0).collect(),
            created: false,
        });
    }

    let mut user = User::new(DEMO_EMAIL, SubscriptionTier::Starter, now);
    user.display_name = Some("Demo User".to_owned());
    user.telegram_id = Some("demo-telegram".to_owned());
    user.discord_id = Some("demo-discord".to_owned());
    users.save(user.clone()).await?;

    let personas = [
        ("Blog Writer", AgentPersona::ContentWriter { focus_topics: vec!["b2b saas".to_owned()] }),
        ("Search Tuner", AgentPersona::SeoSpecialist { focus_topics: vec![] }),
        ("Helpdesk", AgentPersona::CustomerSupport { focus_topics: vec![] }),
    ];

    let mut agent_ids = Vec::new();
    for (index, (name, persona)) in personas.into_iter().enumerate() {
        let agent =
            Agent::new(user.id.clone(), name, persona, now + Duration::seconds(index as i64));
        agents.save(agent.clone()).await?;
        agent_ids.push(agent.id.0);
    }

    Ok(SeedSummary { user_id: user.id.0, agent_ids, created: true })
}

#[cfg(test)]
mod tests {
    use super::seed_demo_data;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("run migrations");

        let first = seed_demo_data(&pool).await.expect("first seed");
        assert!(first.created);
        assert_eq!(first.agent_ids.len(), 3);

        let second = seed_demo_data(&pool).await.expect("second seed");
        assert!(!second.created);
        assert_eq!(second.user_id, first.user_id);
        assert_eq!(second.agent_ids.len(), 3);

        pool.close().await;
    }
}
