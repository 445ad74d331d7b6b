//! Required-header check.
//!
//! Real browsers virtually always send both `Accept` and `Referer` when
//! posting a form; many scripted clients omit one or both. Medium
//! confidence only, since privacy tooling can strip the Referer.

use super::{BotReason, CheckMatch, Confidence, SubmissionCheck, SubmissionContext};

/// Flags submissions missing the Accept or Referer header.
pub struct RequiredHeadersCheck;

impl SubmissionCheck for RequiredHeadersCheck {
    fn evaluate(&self, ctx: &SubmissionContext) -> Option<CheckMatch> {
        if ctx.accept.is_none() || ctx.referer.is_none() {
            return Some(CheckMatch {
                reason: BotReason::MissingBrowserHeaders,
                confidence: Confidence::Medium,
            });
        }
        None
    }

    fn name(&self) -> &'static str {
        "required_headers"
    }
}
