//! Resend HTTP API client.
//!
//! Posts messages to the provider's `/emails` endpoint with a bearer API
//! key. Responses are mapped into `MailerError`: the provider's
//! domain-not-verified refusals become the soft `Sandbox` variant, anything
//! else a hard `Provider` error.

use super::{EmailMessage, Mailer, MailerError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Production endpoint for the provider.
pub const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Client-level timeout around a dispatch call. A hanging provider must not
/// stall the submission response indefinitely.
const DISPATCH_TIMEOUT_SECS: u64 = 10;

/// Error text fragments the provider returns while no domain is verified.
const SANDBOX_MARKERS: &[&str] = &["verify a domain", "testing emails", "is not verified"];

/// `Mailer` implementation backed by the Resend API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl ResendMailer {
    pub fn new(api_key: String) -> Self {
        Self::with_api_url(api_key, RESEND_API_URL.to_string())
    }

    /// Construct against an explicit endpoint, for tests against a local stub.
    pub fn with_api_url(api_key: String, api_url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .use_rustls_tls()
                .timeout(Duration::from_secs(DISPATCH_TIMEOUT_SECS))
                .build()
                .unwrap(),
            api_key,
            api_url,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MailerError::Timeout
                } else {
                    MailerError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            debug!(subject = %message.subject, "email dispatched");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_provider_error(status.as_u16(), &body))
    }
}

/// Map a provider rejection into the error taxonomy.
fn classify_provider_error(status: u16, body: &str) -> MailerError {
    // The provider wraps errors as {"statusCode": ..., "message": "..."}.
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()))
        .unwrap_or_else(|| body.to_string());

    let lower = message.to_lowercase();
    if SANDBOX_MARKERS.iter().any(|marker| lower.contains(marker)) {
        MailerError::Sandbox(message)
    } else {
        MailerError::Provider(format!("status {}: {}", status, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_not_verified_is_sandbox() {
        let err = classify_provider_error(
            403,
            r#"{"statusCode":403,"message":"You can only send testing emails to your own email address. Please verify a domain to send emails to other recipients."}"#,
        );
        assert!(err.is_sandbox());
    }

    #[test]
    fn unverified_domain_variant_is_sandbox() {
        let err = classify_provider_error(
            403,
            r#"{"statusCode":403,"message":"The example.com domain is not verified."}"#,
        );
        assert!(err.is_sandbox());
    }

    #[test]
    fn other_rejections_are_hard_provider_errors() {
        let err = classify_provider_error(
            422,
            r#"{"statusCode":422,"message":"Invalid `to` field."}"#,
        );
        assert!(matches!(err, MailerError::Provider(_)));
        assert!(!err.is_sandbox());
    }

    #[test]
    fn unparseable_bodies_fall_back_to_raw_text() {
        let err = classify_provider_error(500, "upstream exploded");
        match err {
            MailerError::Provider(msg) => assert!(msg.contains("upstream exploded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
