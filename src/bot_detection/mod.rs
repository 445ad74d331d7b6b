//! Bot heuristics for lead-form submissions.
//!
//! Each check inspects one aspect of a submission and the checks run in a
//! fixed order with first-match-wins, so earlier checks take precedence when
//! several would fire. Every positive match carries a categorical reason and
//! a confidence tier; the handler decides how to respond per tier rather
//! than uniformly rejecting.

pub mod email;
pub mod headers;
pub mod name;
pub mod timing;
pub mod user_agent;

pub use email::EmailShapeCheck;
pub use headers::RequiredHeadersCheck;
pub use name::NameShapeCheck;
pub use timing::FillTimingCheck;
pub use user_agent::UserAgentCheck;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Strength tier attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

/// Categorical reason for a positive match, for log triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotReason {
    /// No User-Agent header, or a blank one
    MissingUserAgent,
    /// User-Agent names a non-browser HTTP client or crawler
    AutomatedClient,
    /// Accept or Referer header absent
    MissingBrowserHeaders,
    /// Email matches a placeholder or disposable-mail pattern
    DisposableEmail,
    /// Name is blank, a placeholder, or otherwise implausible
    SuspiciousName,
    /// Form filled implausibly fast or left implausibly stale
    ImplausibleTiming,
}

impl BotReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BotReason::MissingUserAgent => "missing_user_agent",
            BotReason::AutomatedClient => "automated_client",
            BotReason::MissingBrowserHeaders => "missing_browser_headers",
            BotReason::DisposableEmail => "disposable_email",
            BotReason::SuspiciousName => "suspicious_name",
            BotReason::ImplausibleTiming => "implausible_timing",
        }
    }
}

/// Verdict for one submission. Computed fresh per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BotCheckResult {
    pub is_bot: bool,
    /// Present only on a positive verdict
    pub reason: Option<BotReason>,
    pub confidence: Confidence,
}

/// Everything the checks may inspect about one submission.
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub user_agent: Option<String>,
    pub accept: Option<String>,
    pub referer: Option<String>,
    pub name: String,
    pub email: String,
    /// Client-reported form-render time, epoch ms. A signal, never trusted.
    pub rendered_at: Option<i64>,
    /// Client-reported form-submit time, epoch ms. A signal, never trusted.
    pub submitted_at: Option<i64>,
}

impl SubmissionContext {
    /// Build a context from request headers and the parsed form fields.
    pub fn from_request(
        headers: &HeaderMap,
        name: &str,
        email: &str,
        rendered_at: Option<i64>,
        submitted_at: Option<i64>,
    ) -> Self {
        let header = |key: &str| {
            headers
                .get(key)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };

        Self {
            user_agent: header("user-agent"),
            accept: header("accept"),
            referer: header("referer"),
            name: name.to_string(),
            email: email.to_string(),
            rendered_at,
            submitted_at,
        }
    }
}

/// A positive match from a single check.
#[derive(Debug, Clone)]
pub struct CheckMatch {
    pub reason: BotReason,
    pub confidence: Confidence,
}

/// One named heuristic in the ordered sequence.
pub trait SubmissionCheck: Send + Sync {
    /// Evaluate the submission; `Some` short-circuits the sequence.
    fn evaluate(&self, ctx: &SubmissionContext) -> Option<CheckMatch>;

    /// Check name for logging.
    fn name(&self) -> &'static str;
}

/// Ordered heuristics engine.
///
/// The default order is user-agent, required headers, email shape, name
/// shape, fill timing. The order is part of the contract: a request that
/// trips several checks reports the earliest one.
pub struct BotDetector {
    checks: Vec<Box<dyn SubmissionCheck>>,
}

impl BotDetector {
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(UserAgentCheck),
                Box::new(RequiredHeadersCheck),
                Box::new(EmailShapeCheck),
                Box::new(NameShapeCheck),
                Box::new(FillTimingCheck),
            ],
        }
    }

    /// Run the checks in order and return the first match, or a clean
    /// low-confidence verdict when nothing fires.
    pub fn check(&self, ctx: &SubmissionContext) -> BotCheckResult {
        for check in &self.checks {
            if let Some(matched) = check.evaluate(ctx) {
                debug!(
                    check = check.name(),
                    reason = matched.reason.as_str(),
                    confidence = matched.confidence.as_str(),
                    "submission flagged"
                );
                return BotCheckResult {
                    is_bot: true,
                    reason: Some(matched.reason),
                    confidence: matched.confidence,
                };
            }
        }

        BotCheckResult {
            is_bot: false,
            reason: None,
            confidence: Confidence::Low,
        }
    }
}

impl Default for BotDetector {
    fn default() -> Self {
        Self::new()
    }
}
