//! User-Agent check.
//!
//! Flags requests whose User-Agent is absent, blank, or names a
//! non-browser HTTP client, crawler, or browser-automation tool.

use super::{BotReason, CheckMatch, Confidence, SubmissionCheck, SubmissionContext};
use std::sync::LazyLock;

/// Substrings associated with scripted clients and crawlers.
///
/// Matched case-insensitively against the whole User-Agent string.
static CLIENT_DENYLIST: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        // Command-line clients
        "curl",
        "wget",
        "httpie",
        // HTTP libraries
        "python-requests",
        "python-urllib",
        "go-http-client",
        "java/",
        "okhttp",
        "axios",
        "node-fetch",
        "libwww-perl",
        // Crawlers
        "bot",
        "crawler",
        "spider",
        "scraper",
        "scrapy",
        // Browser automation
        "headless",
        "phantomjs",
        "puppeteer",
        "playwright",
        "selenium",
    ]
});

/// Flags missing or denylisted User-Agent strings.
pub struct UserAgentCheck;

impl SubmissionCheck for UserAgentCheck {
    fn evaluate(&self, ctx: &SubmissionContext) -> Option<CheckMatch> {
        let ua = match ctx.user_agent.as_deref() {
            Some(ua) if !ua.trim().is_empty() => ua,
            _ => {
                return Some(CheckMatch {
                    reason: BotReason::MissingUserAgent,
                    confidence: Confidence::High,
                });
            }
        };

        let ua_lower = ua.to_lowercase();
        if CLIENT_DENYLIST.iter().any(|needle| ua_lower.contains(needle)) {
            return Some(CheckMatch {
                reason: BotReason::AutomatedClient,
                confidence: Confidence::High,
            });
        }

        None
    }

    fn name(&self) -> &'static str {
        "user_agent"
    }
}
