//! Core domain for the superclaw message-routing service.
//!
//! Everything in this crate is deterministic and free of IO: the domain
//! model (users, subscription tiers, agents, personas), the pure routing
//! components (intent classification, agent selection, prompt building),
//! the in-process rate limiter, configuration loading, and the layered
//! error model.
//!
//! # Key Types
//!
//! - `domain::User` / `domain::SubscriptionTier` - account + quota model
//! - `domain::Agent` / `domain::AgentPersona` - dispatchable agents
//! - `intent::Intent` - keyword-derived message intent
//! - `ratelimit::RateLimiter` - fixed-window per-user limiter
//! - `config::AppConfig` - layered configuration (defaults, file, env)

pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;
pub mod prompt;
pub mod ratelimit;
pub mod selector;
