//! Lead-capture submission-defense gateway for the author site.
//!
//! Guards the newsletter lead-magnet endpoints with layered defenses and
//! dispatches the transactional delivery email once a submission clears them.
//!
//! # Features
//!
//! - Fixed-window rate limiting by client IP and by normalized email
//! - Ordered bot heuristics with confidence-tiered responses
//! - Sandbox/production email dispatch branching on the verified domain
//! - Structured per-submission metrics through tracing

pub mod bot_detection;
pub mod env;
pub mod mailer;
pub mod metrics;
pub mod rate_limiter;
pub mod routing;
pub mod server;

use crate::bot_detection::BotDetector;
use crate::env::AppConfig;
use crate::mailer::Mailer;
use crate::rate_limiter::RateLimiter;
use std::sync::Arc;

/// Shared application state injected into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ip_limiter: Arc<RateLimiter>,
    pub email_limiter: Arc<RateLimiter>,
    pub detector: Arc<BotDetector>,
    pub mailer: Arc<dyn Mailer>,
}
