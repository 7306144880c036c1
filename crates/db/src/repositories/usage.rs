use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use superclaw_core::domain::{AgentId, Channel, UsageRecord, UserId};

use super::{parse_timestamp, RepositoryError, UsageRepository};
use crate::DbPool;

pub struct SqlUsageRepository {
    pool: DbPool,
}

impl SqlUsageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UsageRepository for SqlUsageRepository {
    async fn append(&self, record: UsageRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO message_usage (
                id,
                user_id,
                agent_id,
                channel,
                period_start,
                recorded_at
             ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.user_id.0)
        .bind(&record.agent_id.0)
        .bind(record.channel.as_str())
        .bind(record.period_start.to_rfc3339())
        .bind(record.recorded_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_for_period(
        &self,
        user_id: &UserId,
        period_start: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count
             FROM message_usage
             WHERE user_id = ? AND period_start = ?",
        )
        .bind(&user_id.0)
        .bind(period_start.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("count")?)
    }

    async fn list_for_period(
        &self,
        user_id: &UserId,
        period_start: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT
                id,
                user_id,
                agent_id,
                channel,
                period_start,
                recorded_at
             FROM message_usage
             WHERE user_id = ? AND period_start = ?
             ORDER BY recorded_at ASC, id ASC",
        )
        .bind(&user_id.0)
        .bind(period_start.to_rfc3339())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(record_from_row).collect()
    }
}

fn record_from_row(row: SqliteRow) -> Result<UsageRecord, RepositoryError> {
    let channel_raw = row.try_get::<String, _>("channel")?;
    let channel = channel_raw
        .parse::<Channel>()
        .map_err(|_| RepositoryError::Decode(format!("unknown channel `{channel_raw}`")))?;

    Ok(UsageRecord {
        id: row.try_get("id")?,
        user_id: UserId(row.try_get("user_id")?),
        agent_id: AgentId(row.try_get("agent_id")?),
        channel,
        period_start: parse_timestamp("period_start", row.try_get("period_start")?)?,
        recorded_at: parse_timestamp("recorded_at", row.try_get("recorded_at")?)?,
    })
}
