//! Fill-timing check.
//!
//! Compares the client-reported form-render and form-submit times. A form
//! completed in under two seconds was almost certainly scripted; one
//! submitted more than thirty minutes after render is a stale or replayed
//! session. Both timestamps come from the client, so this is a Medium
//! confidence signal only and is skipped entirely when either is absent.

use super::{BotReason, CheckMatch, Confidence, SubmissionCheck, SubmissionContext};

/// Fastest plausible human fill time.
const MIN_FILL_MS: i64 = 2_000;
/// Oldest form render still considered a live session.
const MAX_FILL_MS: i64 = 30 * 60 * 1_000;

/// Flags implausibly fast or stale form completion.
pub struct FillTimingCheck;

impl SubmissionCheck for FillTimingCheck {
    fn evaluate(&self, ctx: &SubmissionContext) -> Option<CheckMatch> {
        let (rendered_at, submitted_at) = match (ctx.rendered_at, ctx.submitted_at) {
            (Some(r), Some(s)) => (r, s),
            _ => return None,
        };

        let elapsed = submitted_at - rendered_at;
        if elapsed < MIN_FILL_MS || elapsed > MAX_FILL_MS {
            return Some(CheckMatch {
                reason: BotReason::ImplausibleTiming,
                confidence: Confidence::Medium,
            });
        }
        None
    }

    fn name(&self) -> &'static str {
        "fill_timing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(rendered_at: Option<i64>, submitted_at: Option<i64>) -> SubmissionContext {
        SubmissionContext {
            user_agent: Some("Mozilla/5.0".to_string()),
            accept: Some("text/html".to_string()),
            referer: Some("https://example.com/".to_string()),
            name: "Jane Doe".to_string(),
            email: "jane@gmail.com".to_string(),
            rendered_at,
            submitted_at,
        }
    }

    #[test]
    fn too_fast_is_flagged_medium() {
        let matched = FillTimingCheck.evaluate(&ctx(Some(0), Some(500))).unwrap();
        assert_eq!(matched.reason, BotReason::ImplausibleTiming);
        assert_eq!(matched.confidence, Confidence::Medium);
    }

    #[test]
    fn too_stale_is_flagged() {
        let forty_minutes = 40 * 60 * 1_000;
        assert!(FillTimingCheck.evaluate(&ctx(Some(0), Some(forty_minutes))).is_some());
    }

    #[test]
    fn plausible_fill_time_passes() {
        assert!(FillTimingCheck.evaluate(&ctx(Some(0), Some(5_000))).is_none());
    }

    #[test]
    fn boundaries_are_exclusive() {
        // Exactly 2s and exactly 30min are both still plausible.
        assert!(FillTimingCheck.evaluate(&ctx(Some(0), Some(2_000))).is_none());
        assert!(FillTimingCheck.evaluate(&ctx(Some(0), Some(30 * 60 * 1_000))).is_none());
    }

    #[test]
    fn negative_elapsed_is_flagged() {
        // Submit before render means a tampered or fabricated payload.
        assert!(FillTimingCheck.evaluate(&ctx(Some(10_000), Some(5_000))).is_some());
    }

    #[test]
    fn skipped_when_either_timestamp_is_absent() {
        assert!(FillTimingCheck.evaluate(&ctx(None, Some(500))).is_none());
        assert!(FillTimingCheck.evaluate(&ctx(Some(0), None)).is_none());
        assert!(FillTimingCheck.evaluate(&ctx(None, None)).is_none());
    }
}
