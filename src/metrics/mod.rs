//! # Metrics Module
//!
//! This module provides a struct for tracking per-submission metrics in the
//! leadgate application. It captures timing, client information, and the
//! categorical outcome of each submission, and emits one structured tracing
//! line at completion.
//!
//! ## Features
//!
//! - **Submission Tracking**: Unique id, endpoint, and timing per request
//! - **Outcome Taxonomy**: Every terminal branch of the handler state
//!   machine maps to one categorical outcome
//! - **Operator Triage**: Bot verdicts and dispatch failures carry their
//!   reason text for log review
//!
//! Nothing is persisted; counters and history live in the log stream only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Terminal outcome of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Delivered to the subscriber (production posture)
    Accepted,
    /// Redirected to the owner mailbox (sandbox posture), or the provider
    /// refused in sandbox mode
    Sandboxed,
    /// Required field missing or body unparseable
    ValidationFailed,
    /// IP-dimension rate limit tripped
    RateLimitedIp,
    /// Email-dimension rate limit tripped
    RateLimitedEmail,
    /// High-confidence bot; success-shaped response, no dispatch
    BotDropped,
    /// Medium-confidence bot; rejected with a generic error
    BotRejected,
    /// Email dispatch failed hard
    DispatchFailed,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Accepted => "accepted",
            SubmissionOutcome::Sandboxed => "sandboxed",
            SubmissionOutcome::ValidationFailed => "validation_failed",
            SubmissionOutcome::RateLimitedIp => "rate_limited_ip",
            SubmissionOutcome::RateLimitedEmail => "rate_limited_email",
            SubmissionOutcome::BotDropped => "bot_dropped",
            SubmissionOutcome::BotRejected => "bot_rejected",
            SubmissionOutcome::DispatchFailed => "dispatch_failed",
        }
    }
}

/// Metrics data for one submission, created when the request arrives and
/// completed on the terminal branch.
#[derive(Debug, Serialize)]
pub struct SubmissionMetrics {
    pub id: String,
    pub endpoint: String,
    pub received_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub status_code: Option<u16>,
    pub outcome: Option<SubmissionOutcome>,
    pub error_message: Option<String>,
}

impl SubmissionMetrics {
    pub fn new(endpoint: &str, client_ip: Option<String>, user_agent: Option<String>) -> Self {
        SubmissionMetrics {
            id: Uuid::new_v4().to_string(),
            endpoint: endpoint.to_string(),
            received_at: Utc::now(),
            completed_at: None,
            duration_ms: None,
            client_ip,
            user_agent,
            status_code: None,
            outcome: None,
            error_message: None,
        }
    }

    /// Record detail text for the outcome (bot reason, provider error).
    pub fn set_error(&mut self, error: String) {
        self.error_message = Some(error);
    }

    /// Close out the submission and emit the structured log line.
    pub fn complete(&mut self, outcome: SubmissionOutcome, status_code: u16) {
        let now = Utc::now();
        self.completed_at = Some(now);
        self.duration_ms = Some((now - self.received_at).num_milliseconds());
        self.status_code = Some(status_code);
        self.outcome = Some(outcome);

        info!(
            request_id = %self.id,
            endpoint = %self.endpoint,
            outcome = outcome.as_str(),
            status_code = status_code,
            duration_ms = self.duration_ms.unwrap_or(0),
            client_ip = self.client_ip.as_deref().unwrap_or("unknown"),
            user_agent = self.user_agent.as_deref().unwrap_or(""),
            error = self.error_message.as_deref().unwrap_or(""),
            "submission complete"
        );
    }
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
