//! Name-shape check.
//!
//! Flags blank or placeholder names, keyboard mash, generated-looking
//! letters-plus-digits values, and names carrying URL fragments (a common
//! spam payload location).

use super::{BotReason, CheckMatch, Confidence, SubmissionCheck, SubmissionContext};
use regex::Regex;
use std::sync::LazyLock;

/// Placeholder and generated-name patterns, matched against the trimmed name.
static NAME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // "test user", "Test  User", "testuser"
        Regex::new(r"(?i)^test\s*user$").unwrap(),
        Regex::new(r"(?i)^(test|testing|asdf|qwerty|admin|anonymous|none)$").unwrap(),
        // One unbroken run of 50+ characters is mash, not a name
        Regex::new(r"^\S{50,}$").unwrap(),
        // Letters followed by five or more digits reads as generated
        Regex::new(r"(?i)^[a-z]+\d{5,}$").unwrap(),
    ]
});

/// Substrings that indicate a URL smuggled into the name field.
static URL_FRAGMENTS: &[&str] = &["http://", "https://", "www.", ".com"];

/// Flags placeholder and implausible names.
pub struct NameShapeCheck;

impl SubmissionCheck for NameShapeCheck {
    fn evaluate(&self, ctx: &SubmissionContext) -> Option<CheckMatch> {
        let name = ctx.name.trim();

        let flagged = name.chars().count() < 2
            || NAME_PATTERNS.iter().any(|p| p.is_match(name))
            || {
                let lower = name.to_lowercase();
                URL_FRAGMENTS.iter().any(|f| lower.contains(f))
            };

        if flagged {
            return Some(CheckMatch {
                reason: BotReason::SuspiciousName,
                confidence: Confidence::High,
            });
        }
        None
    }

    fn name(&self) -> &'static str {
        "name_shape"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(name: &str) -> SubmissionContext {
        SubmissionContext {
            user_agent: Some("Mozilla/5.0".to_string()),
            accept: Some("text/html".to_string()),
            referer: Some("https://example.com/".to_string()),
            name: name.to_string(),
            email: "jane@gmail.com".to_string(),
            rendered_at: None,
            submitted_at: None,
        }
    }

    #[test]
    fn blank_and_too_short_names_are_flagged() {
        for name in ["", "   ", "J", " x "] {
            let matched = NameShapeCheck.evaluate(&ctx(name)).unwrap();
            assert_eq!(matched.reason, BotReason::SuspiciousName);
            assert_eq!(matched.confidence, Confidence::High);
        }
    }

    #[test]
    fn placeholder_names_are_flagged() {
        for name in ["test user", "Test User", "testuser", "asdf", "Admin"] {
            assert!(NameShapeCheck.evaluate(&ctx(name)).is_some(), "should flag {name:?}");
        }
    }

    #[test]
    fn long_unbroken_mash_is_flagged() {
        let mash = "x".repeat(50);
        assert!(NameShapeCheck.evaluate(&ctx(&mash)).is_some());
    }

    #[test]
    fn generated_letters_digits_are_flagged() {
        assert!(NameShapeCheck.evaluate(&ctx("user12345")).is_some());
        // Four digits is still plausible (e.g. a year suffix someone types)
        assert!(NameShapeCheck.evaluate(&ctx("jane1999")).is_none());
    }

    #[test]
    fn url_fragments_are_flagged() {
        for name in ["visit https://spam.example", "www.deals4u.biz", "cheap-meds.com"] {
            assert!(NameShapeCheck.evaluate(&ctx(name)).is_some(), "should flag {name:?}");
        }
    }

    #[test]
    fn ordinary_names_pass() {
        for name in ["Jane Doe", "李明", "Seán Ó Briain", "Mary-Jane O'Connor"] {
            assert!(NameShapeCheck.evaluate(&ctx(name)).is_none(), "should pass {name:?}");
        }
    }
}
