use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::agent::AgentId;
use super::channel::Channel;
use super::tier::UNLIMITED;
use super::user::UserId;

/// Calendar-month billing window in UTC: first instant of the month up
/// to (exclusive) the first instant of the next month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BillingPeriod {
    pub fn containing(now: DateTime<Utc>) -> Self {
        let start = month_start(now.year(), now.month());
        let end = if now.month() == 12 {
            month_start(now.year() + 1, 1)
        } else {
            month_start(now.year(), now.month() + 1)
        };
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Outcome of the quota gate for one user at one instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDecision {
    pub allowed: bool,
    pub used: i64,
    pub limit: i64,
    pub remaining: i64,
}

impl QuotaDecision {
    pub fn evaluate(used: i64, limit: i64) -> Self {
        if limit == UNLIMITED {
            return Self { allowed: true, used, limit, remaining: UNLIMITED };
        }
        Self { allowed: used < limit, used, limit, remaining: (limit - used).max(0) }
    }
}

/// One successful routed completion, persisted for usage history and
/// overage billing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: String,
    pub user_id: UserId,
    pub agent_id: AgentId,
    pub channel: Channel,
    pub period_start: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl UsageRecord {
    pub fn new(
        user_id: UserId,
        agent_id: AgentId,
        channel: Channel,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            agent_id,
            channel,
            period_start: BillingPeriod::containing(recorded_at).start,
            recorded_at,
        }
    }
}
