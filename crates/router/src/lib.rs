//! Message routing - the orchestrator that turns an inbound chat message
//! into an agent completion.
//!
//! The router runs a fixed gate chain per message:
//! 1. resolve the sender to an account (channel identity lookup)
//! 2. quota gate (monthly allowance, tier-aware)
//! 3. load dispatchable agents
//! 4. per-user rate limit
//! 5. classify intent, select an agent, build its prompt, call the LLM
//! 6. record usage - only after a successful completion
//!
//! Every gate failure carries a stable user-facing message; internal
//! detail stays in structured logs keyed by a per-route correlation id.

pub mod ledger;
pub mod route;

pub use ledger::{RecordedUsage, UsageLedger};
pub use route::{MessageRouter, RouteError, RouteErrorKind, RouteReply, RouteRequest};
