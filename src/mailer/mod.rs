//! # Mailer Module
//!
//! This module provides the transactional-email capability behind the
//! submission handlers. The `Mailer` trait is the seam: handlers hold an
//! `Arc<dyn Mailer>` so tests can substitute a recording mock, and the
//! production implementation posts to the Resend HTTP API.
//!
//! ## Features
//!
//! - **Provider Abstraction**: One object-safe `send` call per message
//! - **Typed Failures**: Sandbox-mode refusals are distinguished from hard
//!   provider errors, transport failures, and timeouts
//! - **Attachments**: Lead-magnet PDFs are read from disk and base64-encoded
//!   at dispatch time
//!
//! A single attempt is made per message; there are no retries.

pub mod resend;
pub mod templates;

pub use resend::ResendMailer;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::fmt;
use std::path::Path;

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// A file attached to an outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub filename: String,
    /// Base64-encoded file content
    pub content: String,
}

/// One outgoing transactional email.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Failure modes at the provider boundary.
#[derive(Debug)]
pub enum MailerError {
    /// The provider refused because no sending domain is verified; an
    /// expected condition in non-production environments
    Sandbox(String),
    /// Any other provider-side rejection
    Provider(String),
    /// The request never completed
    Transport(String),
    /// The dispatch call exceeded the client timeout
    Timeout,
    /// A lead-magnet file could not be read from disk
    Attachment(String),
}

impl MailerError {
    /// True for the soft sandbox-mode condition the handlers treat as success.
    pub fn is_sandbox(&self) -> bool {
        matches!(self, MailerError::Sandbox(_))
    }
}

impl fmt::Display for MailerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailerError::Sandbox(msg) => write!(f, "provider in sandbox mode: {}", msg),
            MailerError::Provider(msg) => write!(f, "provider rejected message: {}", msg),
            MailerError::Transport(msg) => write!(f, "transport failure: {}", msg),
            MailerError::Timeout => write!(f, "email dispatch timed out"),
            MailerError::Attachment(msg) => write!(f, "attachment unavailable: {}", msg),
        }
    }
}

impl std::error::Error for MailerError {}

/// The "send transactional email" capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt delivery of one message. A single attempt, no retries.
    async fn send(&self, message: &EmailMessage) -> Result<(), MailerError>;
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Read a file from disk and base64-encode it for attachment.
pub async fn load_attachment(path: &Path, filename: &str) -> Result<Attachment, MailerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| MailerError::Attachment(format!("{}: {}", path.display(), e)))?;

    Ok(Attachment {
        filename: filename.to_string(),
        content: STANDARD.encode(bytes),
    })
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
