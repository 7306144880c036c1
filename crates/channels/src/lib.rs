//! Channel adapters - inbound payloads from chat platforms, normalized
//! for routing.
//!
//! Each platform delivers a differently-shaped webhook body; this crate
//! parses only the subset superclaw needs (who sent it, what they said)
//! and turns it into a `RouteRequest`. The `ChannelDispatcher` then runs
//! the request through an injected `RouteService` and maps every routing
//! failure to reply text, so webhook callers always get a message back
//! rather than a transport error.

pub mod dispatcher;
pub mod envelope;

pub use dispatcher::{ChannelDispatcher, DispatchOutcome, NoopRouteService, RouteService};
pub use envelope::{
    DiscordMessage, EnvelopeError, InboundMessage, SlackEventCallback, TelegramUpdate,
};
