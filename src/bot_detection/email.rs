//! Email-shape check.
//!
//! Flags placeholder addresses, sequential test accounts, known
//! disposable-mail domains, and implausibly long local parts.

use super::{BotReason, CheckMatch, Confidence, SubmissionCheck, SubmissionContext};
use regex::Regex;
use std::sync::LazyLock;

/// Local parts longer than this are not something a person typed.
const MAX_LOCAL_PART_LEN: usize = 30;

/// Placeholder address patterns, matched against the normalized address.
static PLACEHOLDER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^test@test\.com$").unwrap(),
        Regex::new(r"^test\d*@").unwrap(),
        Regex::new(r"^(example|sample|fake|asdf|qwerty|noreply)\d*@").unwrap(),
    ]
});

/// Domains of well-known disposable-mail providers.
static DISPOSABLE_DOMAINS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    vec![
        "mailinator.com",
        "guerrillamail.com",
        "10minutemail.com",
        "tempmail.com",
        "temp-mail.org",
        "throwaway.email",
        "yopmail.com",
        "sharklasers.com",
        "trashmail.com",
        "getnada.com",
    ]
});

/// Flags disposable and placeholder email addresses.
pub struct EmailShapeCheck;

impl SubmissionCheck for EmailShapeCheck {
    fn evaluate(&self, ctx: &SubmissionContext) -> Option<CheckMatch> {
        let email = ctx.email.trim().to_lowercase();

        let flagged = PLACEHOLDER_PATTERNS.iter().any(|p| p.is_match(&email))
            || email
                .split_once('@')
                .is_some_and(|(local, domain)| {
                    local.len() > MAX_LOCAL_PART_LEN
                        || DISPOSABLE_DOMAINS.iter().any(|d| domain == *d)
                });

        if flagged {
            return Some(CheckMatch {
                reason: BotReason::DisposableEmail,
                confidence: Confidence::High,
            });
        }
        None
    }

    fn name(&self) -> &'static str {
        "email_shape"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(email: &str) -> SubmissionContext {
        SubmissionContext {
            user_agent: Some("Mozilla/5.0".to_string()),
            accept: Some("text/html".to_string()),
            referer: Some("https://example.com/".to_string()),
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            rendered_at: None,
            submitted_at: None,
        }
    }

    #[test]
    fn classic_placeholder_is_flagged() {
        let matched = EmailShapeCheck.evaluate(&ctx("test@test.com")).unwrap();
        assert_eq!(matched.reason, BotReason::DisposableEmail);
        assert_eq!(matched.confidence, Confidence::High);
    }

    #[test]
    fn sequential_test_accounts_are_flagged() {
        assert!(EmailShapeCheck.evaluate(&ctx("test123@gmail.com")).is_some());
        assert!(EmailShapeCheck.evaluate(&ctx("Test@outlook.com")).is_some());
    }

    #[test]
    fn disposable_domains_are_flagged() {
        assert!(EmailShapeCheck.evaluate(&ctx("foo@mailinator.com")).is_some());
        assert!(EmailShapeCheck.evaluate(&ctx("bar@yopmail.com")).is_some());
    }

    #[test]
    fn overlong_local_part_is_flagged() {
        // 31-character local part
        let email = format!("{}@gmail.com", "a".repeat(31));
        assert!(EmailShapeCheck.evaluate(&ctx(&email)).is_some());

        // 30 characters is still acceptable
        let email = format!("{}@gmail.com", "a".repeat(30));
        assert!(EmailShapeCheck.evaluate(&ctx(&email)).is_none());
    }

    #[test]
    fn ordinary_addresses_pass() {
        for email in ["jane@gmail.com", "j.doe+news@proton.me", "contest@winners.org"] {
            assert!(EmailShapeCheck.evaluate(&ctx(email)).is_none(), "should pass {email}");
        }
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert!(EmailShapeCheck.evaluate(&ctx("  TEST@TEST.COM  ")).is_some());
    }
}
