use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use superclaw_router::{RouteError, RouteErrorKind, RouteReply, RouteRequest};

use crate::envelope::InboundMessage;

/// Routing seam the dispatcher talks to. `MessageRouter` implements it
/// in the server wiring; tests script it.
#[async_trait]
pub trait RouteService: Send + Sync {
    async fn route(&self, request: RouteRequest) -> Result<RouteReply, RouteError>;
}

/// What goes back to the platform. Webhook callers always get reply
/// text; `reply` carries the structured result when routing succeeded.
#[derive(Clone, Debug)]
pub struct DispatchOutcome {
    pub text: String,
    pub reply: Option<RouteReply>,
}

pub struct ChannelDispatcher {
    service: Arc<dyn RouteService>,
}

impl ChannelDispatcher {
    pub fn new(service: Arc<dyn RouteService>) -> Self {
        Self { service }
    }

    /// Route one inbound message. Every `RouteError` collapses to its
    /// user-facing text; transport-level failure is not a channel
    /// outcome here.
    pub async fn dispatch(&self, inbound: InboundMessage) -> DispatchOutcome {
        let channel = inbound.channel;
        match self.service.route(inbound.into_request()).await {
            Ok(reply) => {
                debug!(
                    event_name = "channel.dispatched",
                    channel = %channel,
                    agent_id = %reply.agent_id,
                    "reply dispatched"
                );
                DispatchOutcome { text: reply.text.clone(), reply: Some(reply) }
            }
            Err(error) => {
                info!(
                    event_name = "channel.route_rejected",
                    channel = %channel,
                    error = %error,
                    "route rejected; replying with user-facing text"
                );
                DispatchOutcome { text: error.user_message().to_owned(), reply: None }
            }
        }
    }
}

/// Inert stand-in used before the router is wired, and in tests that
/// only exercise parsing.
pub struct NoopRouteService;

#[async_trait]
impl RouteService for NoopRouteService {
    async fn route(&self, _request: RouteRequest) -> Result<RouteReply, RouteError> {
        Err(RouteError::untraced(RouteErrorKind::NoAgents))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use superclaw_core::domain::Channel;
    use superclaw_core::intent::Intent;
    use superclaw_router::{RouteError, RouteErrorKind, RouteReply, RouteRequest};

    use super::{ChannelDispatcher, NoopRouteService, RouteService};
    use crate::envelope::InboundMessage;

    struct ScriptedRouteService {
        results: Mutex<VecDeque<Result<RouteReply, RouteError>>>,
        requests: Mutex<Vec<RouteRequest>>,
    }

    impl ScriptedRouteService {
        fn new(results: Vec<Result<RouteReply, RouteError>>) -> Self {
            Self { results: Mutex::new(results.into()), requests: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl RouteService for ScriptedRouteService {
        async fn route(&self, request: RouteRequest) -> Result<RouteReply, RouteError> {
            self.requests.lock().await.push(request);
            self.results
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(RouteError::untraced(RouteErrorKind::UnknownUser)))
        }
    }

    fn inbound(text: &str) -> InboundMessage {
        InboundMessage {
            channel: Channel::Telegram,
            external_user_id: "42".to_owned(),
            text: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn successful_route_returns_reply_text() {
        let service = Arc::new(ScriptedRouteService::new(vec![Ok(RouteReply {
            correlation_id: "c-1".to_owned(),
            agent_id: "a-1".to_owned(),
            agent_name: "writer".to_owned(),
            intent: Intent::Content,
            text: "here you go".to_owned(),
        })]));
        let dispatcher = ChannelDispatcher::new(service.clone());

        let outcome = dispatcher.dispatch(inbound("write a post")).await;
        assert_eq!(outcome.text, "here you go");
        assert!(outcome.reply.is_some());

        let requests = service.requests.lock().await;
        assert_eq!(requests[0].external_user_id, "42");
        assert_eq!(requests[0].channel, Channel::Telegram);
    }

    #[tokio::test]
    async fn route_errors_become_reply_text_not_failures() {
        let service = Arc::new(ScriptedRouteService::new(vec![
            Err(RouteError::untraced(RouteErrorKind::UnknownUser)),
            Err(RouteError::untraced(RouteErrorKind::QuotaExhausted { used: 500, limit: 500 })),
        ]));
        let dispatcher = ChannelDispatcher::new(service);

        let outcome = dispatcher.dispatch(inbound("hello")).await;
        assert_eq!(outcome.text, "User not found. Use /start to create an account.");
        assert!(outcome.reply.is_none());

        let outcome = dispatcher.dispatch(inbound("hello again")).await;
        assert_eq!(outcome.text, "Message limit reached. Upgrade your plan at /upgrade");
    }

    #[tokio::test]
    async fn noop_service_reports_missing_agents() {
        let dispatcher = ChannelDispatcher::new(Arc::new(NoopRouteService));
        let outcome = dispatcher.dispatch(inbound("hi")).await;
        assert_eq!(outcome.text, "No active agents found. Use /start to create one!");
    }
}
