use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};

use superclaw_core::domain::{Channel, SubscriptionTier, User, UserId};

use super::{parse_timestamp, RepositoryError, UserRepository};
use crate::DbPool;

pub struct SqlUserRepository {
    pool: DbPool,
}

impl SqlUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

const USER_COLUMNS: &str = "id,
                email,
                display_name,
                tier,
                telegram_id,
                discord_id,
                slack_id,
                messages_this_month,
                message_limit,
                created_at,
                updated_at";

#[async_trait::async_trait]
impl UserRepository for SqlUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT
                {USER_COLUMNS}
             FROM users
             WHERE id = ?"
        ))
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn find_by_channel_identity(
        &self,
        channel: Channel,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let column = match channel {
            Channel::Telegram => "telegram_id",
            Channel::Discord => "discord_id",
            Channel::Slack => "slack_id",
            Channel::Api => "id",
        };

        let row = sqlx::query(&format!(
            "SELECT
                {USER_COLUMNS}
             FROM users
             WHERE {column} = ?"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(user_from_row).transpose()
    }

    async fn save(&self, user: User) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (
                id,
                email,
                display_name,
                tier,
                telegram_id,
                discord_id,
                slack_id,
                messages_this_month,
                message_limit,
                created_at,
                updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                display_name = excluded.display_name,
                tier = excluded.tier,
                telegram_id = excluded.telegram_id,
                discord_id = excluded.discord_id,
                slack_id = excluded.slack_id,
                messages_this_month = excluded.messages_this_month,
                message_limit = excluded.message_limit,
                updated_at = excluded.updated_at",
        )
        .bind(&user.id.0)
        .bind(&user.email)
        .bind(user.display_name.as_deref())
        .bind(user.tier.as_str())
        .bind(user.telegram_id.as_deref())
        .bind(user.discord_id.as_deref())
        .bind(user.slack_id.as_deref())
        .bind(user.messages_this_month)
        .bind(user.message_limit)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn increment_usage(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<i64, RepositoryError> {
        let row = sqlx::query(
            "UPDATE users
             SET messages_this_month = messages_this_month + 1,
                 updated_at = ?
             WHERE id = ?
             RETURNING messages_this_month",
        )
        .bind(now.to_rfc3339())
        .bind(&id.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("messages_this_month")?)
    }

    async fn reset_usage(&self, id: &UserId, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE users
             SET messages_this_month = 0,
                 updated_at = ?
             WHERE id = ?",
        )
        .bind(now.to_rfc3339())
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn reset_billable_usage(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            "UPDATE users
             SET messages_this_month = 0,
                 updated_at = ?
             WHERE tier IN ('STARTER', 'PRO', 'AGENCY')",
        )
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn user_from_row(row: SqliteRow) -> Result<User, RepositoryError> {
    let tier_raw = row.try_get::<String, _>("tier")?;
    let tier = tier_raw
        .parse::<SubscriptionTier>()
        .map_err(|_| RepositoryError::Decode(format!("unknown tier `{tier_raw}`")))?;

    Ok(User {
        id: UserId(row.try_get("id")?),
        email: row.try_get("email")?,
        display_name: row.try_get("display_name")?,
        tier,
        telegram_id: row.try_get("telegram_id")?,
        discord_id: row.try_get("discord_id")?,
        slack_id: row.try_get("slack_id")?,
        messages_this_month: row.try_get("messages_this_month")?,
        message_limit: row.try_get("message_limit")?,
        created_at: parse_timestamp("created_at", row.try_get("created_at")?)?,
        updated_at: parse_timestamp("updated_at", row.try_get("updated_at")?)?,
    })
}
