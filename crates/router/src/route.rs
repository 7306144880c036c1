use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use superclaw_core::domain::{Agent, Channel};
use superclaw_core::intent::{self, Intent};
use superclaw_core::prompt::system_prompt;
use superclaw_core::ratelimit::{Clock, RateLimitDecision, RateLimiter};
use superclaw_core::selector;
use superclaw_db::repositories::{AgentRepository, RepositoryError, UserRepository};
use superclaw_llm::{CompletionClient, CompletionError};

use crate::ledger::UsageLedger;

#[derive(Clone, Debug, Deserialize)]
pub struct RouteRequest {
    pub channel: Channel,
    pub external_user_id: String,
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RouteReply {
    pub correlation_id: String,
    pub agent_id: String,
    pub agent_name: String,
    pub intent: Intent,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum RouteErrorKind {
    #[error("no account matches the sender identity")]
    UnknownUser,
    #[error("monthly message quota exhausted ({used}/{limit})")]
    QuotaExhausted { used: i64, limit: i64 },
    #[error("no dispatchable agents for this account")]
    NoAgents,
    #[error("rate limit exceeded")]
    RateLimited { retry_after: Duration },
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
}

impl RouteErrorKind {
    /// Stable text safe to send back over any channel. Internal detail
    /// never leaves the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownUser => "User not found. Use /start to create an account.",
            Self::QuotaExhausted { .. } => "Message limit reached. Upgrade your plan at /upgrade",
            Self::NoAgents => "No active agents found. Use /start to create one!",
            Self::RateLimited { .. } => "Rate limit exceeded. Please slow down.",
            Self::Completion(error) => error.user_message(),
            Self::Storage(_) => "The service is temporarily unavailable. Please retry shortly.",
        }
    }
}

/// A rejected route, tagged with the correlation id its log trail is
/// keyed by. A client that reports the id can be joined to the logs.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct RouteError {
    pub correlation_id: String,
    #[source]
    pub kind: RouteErrorKind,
}

impl RouteError {
    /// A failure with no route behind it, so no log trail to join.
    /// Stand-in services use this; `MessageRouter` never does.
    pub fn untraced(kind: RouteErrorKind) -> Self {
        Self { correlation_id: Uuid::new_v4().to_string(), kind }
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

pub struct MessageRouter {
    users: Arc<dyn UserRepository>,
    agents: Arc<dyn AgentRepository>,
    ledger: UsageLedger,
    rate_limiter: Arc<RateLimiter>,
    completions: Arc<dyn CompletionClient>,
    clock: Arc<dyn Clock>,
}

impl MessageRouter {
    pub fn new(
        users: Arc<dyn UserRepository>,
        agents: Arc<dyn AgentRepository>,
        ledger: UsageLedger,
        rate_limiter: Arc<RateLimiter>,
        completions: Arc<dyn CompletionClient>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { users, agents, ledger, rate_limiter, completions, clock }
    }

    /// Run one message through the full gate chain. Usage is recorded
    /// only after the completion succeeds; a failed completion costs the
    /// user nothing. The reply and any error both carry the correlation
    /// id the route logged with.
    pub async fn route(&self, request: RouteRequest) -> Result<RouteReply, RouteError> {
        let correlation_id = Uuid::new_v4().to_string();
        self.dispatch(&correlation_id, request)
            .await
            .map_err(|kind| RouteError { correlation_id, kind })
    }

    async fn dispatch(
        &self,
        correlation_id: &str,
        request: RouteRequest,
    ) -> Result<RouteReply, RouteErrorKind> {
        info!(
            event_name = "route.received",
            correlation_id = %correlation_id,
            channel = %request.channel,
            "inbound message received"
        );

        let user = self
            .users
            .find_by_channel_identity(request.channel, &request.external_user_id)
            .await?
            .ok_or_else(|| {
                info!(
                    event_name = "route.unknown_user",
                    correlation_id = %correlation_id,
                    channel = %request.channel,
                    "sender has no account"
                );
                RouteErrorKind::UnknownUser
            })?;

        let quota = self.ledger.check_quota(&user);
        if !quota.allowed {
            info!(
                event_name = "route.quota_exhausted",
                correlation_id = %correlation_id,
                user_id = %user.id,
                tier = %user.tier,
                used = quota.used,
                limit = quota.limit,
                "monthly quota exhausted"
            );
            return Err(RouteErrorKind::QuotaExhausted { used: quota.used, limit: quota.limit });
        }

        let agents = self.agents.list_dispatchable_for_user(&user.id).await?;
        if agents.is_empty() {
            info!(
                event_name = "route.no_agents",
                correlation_id = %correlation_id,
                user_id = %user.id,
                "no dispatchable agents"
            );
            return Err(RouteErrorKind::NoAgents);
        }

        let now = self.clock.now();
        if let RateLimitDecision::Denied { retry_after } =
            self.rate_limiter.check(user.id.as_str(), now)
        {
            info!(
                event_name = "route.rate_limited",
                correlation_id = %correlation_id,
                user_id = %user.id,
                retry_after_secs = retry_after.as_secs(),
                "per-user rate limit exceeded"
            );
            return Err(RouteErrorKind::RateLimited { retry_after });
        }

        let message_intent = intent::classify(&request.text);
        let agent = select(&agents, message_intent);
        debug!(
            event_name = "route.agent_selected",
            correlation_id = %correlation_id,
            user_id = %user.id,
            agent_id = %agent.id,
            intent = %message_intent,
            "agent selected"
        );

        let prompt = system_prompt(&agent.persona);
        let reply_text =
            self.completions.complete(&prompt, &request.text).await.map_err(|completion_error| {
                warn!(
                    event_name = "route.completion_failed",
                    correlation_id = %correlation_id,
                    user_id = %user.id,
                    agent_id = %agent.id,
                    error = %completion_error,
                    "completion failed; no usage recorded"
                );
                completion_error
            })?;

        // The completion already happened; a bookkeeping failure must
        // not eat the reply.
        match self.ledger.record_usage(&user, &agent.id, request.channel, self.clock.now()).await {
            Ok(recorded) => {
                info!(
                    event_name = "route.completed",
                    correlation_id = %correlation_id,
                    user_id = %user.id,
                    agent_id = %agent.id,
                    intent = %message_intent,
                    messages_this_month = recorded.total_this_month,
                    over_limit = recorded.over_limit,
                    "message routed"
                );
            }
            Err(record_error) => {
                error!(
                    event_name = "route.usage_record_failed",
                    correlation_id = %correlation_id,
                    user_id = %user.id,
                    agent_id = %agent.id,
                    error = %record_error,
                    "completion delivered but usage recording failed"
                );
            }
        }

        Ok(RouteReply {
            correlation_id: correlation_id.to_owned(),
            agent_id: agent.id.0.clone(),
            agent_name: agent.name.clone(),
            intent: message_intent,
            text: reply_text,
        })
    }
}

fn select(agents: &[Agent], message_intent: Intent) -> &Agent {
    // The empty case was handled by the gate above; the selector only
    // returns None for an empty slice.
    selector::select_agent(agents, message_intent).unwrap_or(&agents[0])
}
