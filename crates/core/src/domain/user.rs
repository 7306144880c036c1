use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::channel::Channel;
use super::tier::SubscriptionTier;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: Option<String>,
    pub tier: SubscriptionTier,
    pub telegram_id: Option<String>,
    pub discord_id: Option<String>,
    pub slack_id: Option<String>,
    pub messages_this_month: i64,
    /// Copied from the tier table at signup; kept on the row so support
    /// can grant per-user exceptions without a tier change.
    pub message_limit: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, tier: SubscriptionTier, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            display_name: None,
            tier,
            telegram_id: None,
            discord_id: None,
            slack_id: None,
            messages_this_month: 0,
            message_limit: tier.message_limit(),
            created_at: now,
            updated_at: now,
        }
    }

    /// External identity for a chat channel; `Api` has none (callers
    /// address the user by internal id).
    pub fn external_id(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Telegram => self.telegram_id.as_deref(),
            Channel::Discord => self.discord_id.as_deref(),
            Channel::Slack => self.slack_id.as_deref(),
            Channel::Api => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Channel, SubscriptionTier, User};

    #[test]
    fn new_user_takes_limit_from_tier_table() {
        let user = User::new("a@example.com", SubscriptionTier::Starter, Utc::now());
        assert_eq!(user.message_limit, 500);
        assert_eq!(user.messages_this_month, 0);
    }

    #[test]
    fn external_id_follows_channel() {
        let mut user = User::new("a@example.com", SubscriptionTier::Free, Utc::now());
        user.telegram_id = Some("tg-1".to_owned());
        assert_eq!(user.external_id(Channel::Telegram), Some("tg-1"));
        assert_eq!(user.external_id(Channel::Discord), None);
        assert_eq!(user.external_id(Channel::Api), None);
    }
}
