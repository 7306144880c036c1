use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use superclaw_core::domain::{
    AgentId, Channel, QuotaDecision, SubscriptionTier, UsageRecord, User, UserId, UNLIMITED,
};
use superclaw_db::repositories::{RepositoryError, UsageRepository, UserRepository};

/// Outcome of recording one successful completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedUsage {
    pub total_this_month: i64,
    pub over_limit: bool,
}

/// Quota decisions and usage accounting over the user and usage stores.
///
/// Recording never blocks a message: the quota gate runs before the
/// completion, and whatever the counter says afterwards is reporting
/// (overage billing), not enforcement.
pub struct UsageLedger {
    users: Arc<dyn UserRepository>,
    usage: Arc<dyn UsageRepository>,
    enforce_free_tier: bool,
}

impl UsageLedger {
    pub fn new(
        users: Arc<dyn UserRepository>,
        usage: Arc<dyn UsageRepository>,
        enforce_free_tier: bool,
    ) -> Self {
        Self { users, usage, enforce_free_tier }
    }

    pub fn check_quota(&self, user: &User) -> QuotaDecision {
        let mut decision = QuotaDecision::evaluate(user.messages_this_month, user.message_limit);
        if user.tier == SubscriptionTier::Free && !self.enforce_free_tier {
            // Legacy bypass: Free riders skip the gate entirely.
            decision.allowed = true;
        }
        decision
    }

    /// Bump the monthly counter atomically in the store, then append the
    /// per-message record. The increment is the source of truth; the
    /// record row feeds history and overage reporting.
    pub async fn record_usage(
        &self,
        user: &User,
        agent_id: &AgentId,
        channel: Channel,
        now: DateTime<Utc>,
    ) -> Result<RecordedUsage, RepositoryError> {
        let total_this_month = self.users.increment_usage(&user.id, now).await?;
        let record = UsageRecord::new(user.id.clone(), agent_id.clone(), channel, now);
        self.usage.append(record).await?;

        let over_limit = user.message_limit != UNLIMITED && total_this_month > user.message_limit;
        Ok(RecordedUsage { total_this_month, over_limit })
    }

    pub async fn reset_monthly(
        &self,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.users.reset_usage(user_id, now).await
    }

    /// Monthly batch reset across Starter/Pro/Agency. Free users keep
    /// their counter: theirs is a lifetime allowance.
    pub async fn reset_all_billable(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let reset = self.users.reset_billable_usage(now).await?;
        info!(event_name = "usage.monthly_reset", users_reset = reset, "monthly usage reset");
        Ok(reset)
    }

    /// Overage owed for a billing period. Only Starter accrues overage;
    /// Free is hard-capped and the unlimited tiers never exceed.
    pub fn overage_charge_cents(tier: SubscriptionTier, used: i64, limit: i64) -> i64 {
        if limit == UNLIMITED || used <= limit {
            return 0;
        }
        (used - limit) * tier.overage_cents_per_message()
    }
}
