pub mod agent;
pub mod channel;
pub mod tier;
pub mod usage;
pub mod user;

pub use agent::{Agent, AgentId, AgentPersona, AgentStatus};
pub use channel::Channel;
pub use tier::{SubscriptionTier, UNLIMITED};
pub use usage::{BillingPeriod, QuotaDecision, UsageRecord};
pub use user::{User, UserId};
