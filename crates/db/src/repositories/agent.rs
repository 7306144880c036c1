use sqlx::{sqlite::SqliteRow, Row};

use superclaw_core::domain::{Agent, AgentId, AgentPersona, AgentStatus, UserId};

use super::{parse_timestamp, AgentRepository, RepositoryError};
use crate::DbPool;

pub struct SqlAgentRepository {
    pool: DbPool,
}

impl SqlAgentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const AGENT_COLUMNS: &str = "id,
                owner_id,
                name,
                status,
                persona_kind,
                instructions,
                focus_topics_json,
                created_at";

#[async_trait::async_trait]
impl AgentRepository for SqlAgentRepository {
    async fn find_by_id(&self, id: &AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT
                {AGENT_COLUMNS}
             FROM agents
             WHERE id = ?"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(agent_from_row).transpose()
    }

    async fn list_dispatchable_for_user(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT
                {AGENT_COLUMNS}
             FROM agents
             WHERE owner_id = ? AND status IN ('active', 'running')
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(&owner_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(agent_from_row).collect()
    }

    async fn save(&self, agent: Agent) -> Result<(), RepositoryError> {
        let focus_topics_json =
            serde_json::to_string(agent.persona.focus_topics()).map_err(|error| {
                RepositoryError::Decode(format!("could not encode focus topics: {error}"))
            })?;

        sqlx::query(
            "INSERT INTO agents (
                id,
                owner_id,
                name,
                status,
                persona_kind,
                instructions,
                focus_topics_json,
                created_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                owner_id = excluded.owner_id,
                name = excluded.name,
                status = excluded.status,
                persona_kind = excluded.persona_kind,
                instructions = excluded.instructions,
                focus_topics_json = excluded.focus_topics_json",
        )
        .bind(&agent.id.0)
        .bind(&agent.owner_id.0)
        .bind(&agent.name)
        .bind(agent.status.as_str())
        .bind(agent.persona.kind_str())
        .bind(agent.persona.instructions())
        .bind(focus_topics_json)
        .bind(agent.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn agent_from_row(row: SqliteRow) -> Result<Agent, RepositoryError> {
    let status_raw = row.try_get::<String, _>("status")?;
    let status = status_raw
        .parse::<AgentStatus>()
        .map_err(|_| RepositoryError::Decode(format!("unknown agent status `{status_raw}`")))?;

    let focus_topics_raw = row.try_get::<String, _>("focus_topics_json")?;
    let focus_topics: Vec<String> = serde_json::from_str(&focus_topics_raw).map_err(|error| {
        RepositoryError::Decode(format!("invalid focus_topics_json `{focus_topics_raw}`: {error}"))
    })?;

    let kind = row.try_get::<String, _>("persona_kind")?;
    let instructions = row.try_get::<Option<String>, _>("instructions")?;
    let persona = AgentPersona::from_parts(&kind, instructions, focus_topics)
        .map_err(|error| RepositoryError::Decode(error.to_string()))?;

    Ok(Agent {
        id: AgentId(row.try_get("id")?),
        owner_id: UserId(row.try_get("owner_id")?),
        name: row.try_get("name")?,
        status,
        persona,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
    })
}
