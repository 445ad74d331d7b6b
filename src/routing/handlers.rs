
//! # Submission Handlers Module
//!
//! This module implements the request-handling state machine for the
//! lead-capture endpoints. Both lead magnets run through one parameterized
//! handler; per-endpoint `LeadConfig` values supply the copy and attachment.
//!
//! ## Request Flow
//!
//! 1. Parse the JSON body and extract the required fields
//! 2. Validate that name, email, and city are present
//! 3. Rate-limit by client IP, then by normalized email
//! 4. Run the bot heuristics and branch on the confidence tier
//! 5. Dispatch the lead-magnet email (production) or a redirected summary
//!    (sandbox), then respond
//!
//! ## Error Handling
//!
//! - Missing fields (400), rate limits (429), medium-confidence bot (400)
//! - High-confidence bots receive a success-shaped 200 with no dispatch, so
//!   an operator's logs see the detection but the client never does
//! - Provider sandbox refusals surface as a 200 with an explanatory
//!   message; hard dispatch failures as an opaque 500

use crate::bot_detection::{Confidence, SubmissionContext};
use crate::mailer::{self, EmailMessage, MailerError, templates};
use crate::metrics::{SubmissionMetrics, SubmissionOutcome};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

/// Display name on outgoing mail.
const FROM_NAME: &str = "Cat Luker Books";

/// Provider-supplied sender usable without a verified domain.
const SANDBOX_FROM: &str = "Cat Luker Books <onboarding@resend.dev>";

const MSG_REQUIRED_FIELDS: &str = "Name, email, and city are required.";
const MSG_IP_LIMITED: &str = "Too many requests. Please try again in a minute.";
const MSG_EMAIL_LIMITED: &str =
    "You're already subscribed! Check your inbox for your download.";
const MSG_NOT_PROCESSED: &str = "Your submission could not be processed.";
const MSG_DISPATCH_FAILED: &str =
    "Something went wrong sending your email. Please try again later.";
const MSG_SANDBOX_DELIVERY: &str =
    "Thanks for signing up! The site is in sandbox mode, so your download was routed to the site mailbox.";
const MSG_PROVIDER_TEST_MODE: &str =
    "Thanks for signing up! Email delivery is in test mode right now, so nothing was sent to your address yet.";

///////////////////////////////////////////////////////////////////////////////
//****                         Public Structs                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Per-endpoint configuration, shared between handlers and routes
#[derive(Debug)]
pub struct LeadConfig {
    pub slug: &'static str,
    pub title: &'static str,
    pub attachment_file: &'static str,
    pub success_subject: &'static str,
    pub sandbox_subject: &'static str,
}

/// The Bible-study-guide lead magnet.
pub const BIBLE_STUDY_LEAD: LeadConfig = LeadConfig {
    slug: "subscribe",
    title: "the 1930s Adventure Bible Study Guide",
    attachment_file: "bible-study-guide.pdf",
    success_subject: "Your free Bible study guide is here!",
    sandbox_subject: "[Sandbox] Bible study guide signup",
};

/// The Cat Luker sample-chapters lead magnet.
pub const CAT_LUKER_LEAD: LeadConfig = LeadConfig {
    slug: "subscribe-catluker",
    title: "the Cat Luker sample chapters",
    attachment_file: "cat-luker-sample.pdf",
    success_subject: "Your Cat Luker sample chapters are here!",
    sandbox_subject: "[Sandbox] Cat Luker sample signup",
};

/// Incoming submission payload. The timing fields are client-reported and
/// feed the bot heuristics as a signal only.
#[derive(Debug, Deserialize)]
pub struct Submission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub timestamp: Option<i64>,
    #[serde(rename = "submitTime")]
    pub submit_time: Option<i64>,
}

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Handles POST /api/subscribe
pub async fn handle_subscribe(
    state: State<AppState>,
    headers: HeaderMap,
    payload: Bytes,
) -> Response {
    handle_submission(state, &BIBLE_STUDY_LEAD, headers, payload).await
}

/// Handles POST /api/subscribe-catluker
pub async fn handle_subscribe_catluker(
    state: State<AppState>,
    headers: HeaderMap,
    payload: Bytes,
) -> Response {
    handle_submission(state, &CAT_LUKER_LEAD, headers, payload).await
}

/// Core submission state machine, shared by both lead-magnet endpoints
pub async fn handle_submission(
    State(state): State<AppState>,
    lead: &LeadConfig,
    headers: HeaderMap,
    payload: Bytes,
) -> Response {
    let client_ip = client_ip_from_headers(&headers);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let mut metrics =
        SubmissionMetrics::new(lead.slug, Some(client_ip.clone()), user_agent);

    info!(
        request_id = %metrics.id,
        endpoint = lead.slug,
        client_ip = %client_ip,
        "incoming submission"
    );

    // Parse
    let submission: Submission = match serde_json::from_slice(&payload) {
        Ok(submission) => submission,
        Err(e) => {
            metrics.set_error(format!("unparseable body: {}", e));
            metrics.complete(SubmissionOutcome::ValidationFailed, 400);
            return json_error(StatusCode::BAD_REQUEST, "Invalid request body.");
        }
    };

    // Validate required fields
    let (name, email, city) = match required_fields(&submission) {
        Some(fields) => fields,
        None => {
            metrics.complete(SubmissionOutcome::ValidationFailed, 400);
            return json_error(StatusCode::BAD_REQUEST, MSG_REQUIRED_FIELDS);
        }
    };

    // Rate-limit by client IP
    if state
        .ip_limiter
        .is_rate_limited(&format!("ip:{}", client_ip), &state.config.ip_rate_limit)
    {
        metrics.complete(SubmissionOutcome::RateLimitedIp, 429);
        return json_error(StatusCode::TOO_MANY_REQUESTS, MSG_IP_LIMITED);
    }

    // Rate-limit by normalized email
    let email_norm = email.trim().to_lowercase();
    if state.email_limiter.is_rate_limited(
        &format!("email:{}", email_norm),
        &state.config.email_rate_limit,
    ) {
        metrics.complete(SubmissionOutcome::RateLimitedEmail, 429);
        return json_error(StatusCode::TOO_MANY_REQUESTS, MSG_EMAIL_LIMITED);
    }

    // Bot verdict
    let ctx = SubmissionContext::from_request(
        &headers,
        name,
        email,
        submission.timestamp,
        submission.submit_time,
    );
    let verdict = state.detector.check(&ctx);

    if verdict.is_bot {
        let reason = verdict
            .reason
            .map(|r| r.as_str())
            .unwrap_or("unknown");

        if verdict.confidence == Confidence::High {
            // Do not reveal detection: respond success-shaped, skip dispatch.
            warn!(
                request_id = %metrics.id,
                reason = reason,
                confidence = verdict.confidence.as_str(),
                "dropping high-confidence bot submission"
            );
            metrics.set_error(reason.to_string());
            metrics.complete(SubmissionOutcome::BotDropped, 200);
            return json_success(&success_message(lead), false);
        }

        warn!(
            request_id = %metrics.id,
            reason = reason,
            confidence = verdict.confidence.as_str(),
            "rejecting medium-confidence bot submission"
        );
        metrics.set_error(reason.to_string());
        metrics.complete(SubmissionOutcome::BotRejected, 400);
        return json_error(StatusCode::BAD_REQUEST, MSG_NOT_PROCESSED);
    }

    // Dispatch
    match dispatch_lead(&state, lead, name, &email_norm, city).await {
        Ok(false) => {
            metrics.complete(SubmissionOutcome::Accepted, 200);
            json_success(&success_message(lead), false)
        }
        Ok(true) => {
            metrics.complete(SubmissionOutcome::Sandboxed, 200);
            json_success(MSG_SANDBOX_DELIVERY, true)
        }
        Err(e) if e.is_sandbox() => {
            // Expected while no domain is verified; reassure, don't fail.
            info!(request_id = %metrics.id, error = %e, "provider in sandbox mode");
            metrics.complete(SubmissionOutcome::Sandboxed, 200);
            json_success(MSG_PROVIDER_TEST_MODE, true)
        }
        Err(e) => {
            // Provider detail stays server-side.
            error!(request_id = %metrics.id, error = %e, "email dispatch failed");
            metrics.set_error(e.to_string());
            metrics.complete(SubmissionOutcome::DispatchFailed, 500);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, MSG_DISPATCH_FAILED)
        }
    }
}

/// Derive the client IP from forwarding headers, defaulting to "unknown".
pub fn client_ip_from_headers(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}

///////////////////////////////////////////////////////////////////////////////
//****                      Private Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Extract the required fields, treating blank strings as missing.
fn required_fields(submission: &Submission) -> Option<(&str, &str, &str)> {
    fn field(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    Some((
        field(&submission.name)?,
        field(&submission.email)?,
        field(&submission.city)?,
    ))
}

/// Send the lead email, branching on posture. Returns `Ok(true)` when the
/// message was redirected to the owner mailbox (sandbox posture).
async fn dispatch_lead(
    state: &AppState,
    lead: &LeadConfig,
    name: &str,
    email: &str,
    city: &str,
) -> Result<bool, MailerError> {
    let config = &state.config;

    match &config.verified_domain {
        Some(domain) => {
            // Production posture: deliver the lead magnet to the submitter.
            let from = format!("{} <newsletter@{}>", FROM_NAME, domain);
            let attachment_path = config.assets_dir.join(lead.attachment_file);
            let attachment =
                mailer::load_attachment(&attachment_path, lead.attachment_file).await?;

            let delivery = EmailMessage {
                from: from.clone(),
                to: vec![email.to_string()],
                subject: lead.success_subject.to_string(),
                text: templates::delivery_text(lead.title, name),
                html: templates::delivery_html(lead.title, name),
                attachments: vec![attachment],
            };
            state.mailer.send(&delivery).await?;

            // Best-effort owner notification: failure is logged, never
            // surfaced, since the submitter's own email already went out.
            let notification = EmailMessage {
                from,
                to: vec![config.owner_email.clone()],
                subject: format!("New signup: {}", lead.title),
                text: templates::owner_notification_text(lead.title, name, email, city),
                html: templates::owner_notification_html(lead.title, name, email, city),
                attachments: vec![],
            };
            let mailer = state.mailer.clone();
            let slug = lead.slug;
            tokio::spawn(async move {
                if let Err(e) = mailer.send(&notification).await {
                    warn!(endpoint = slug, error = %e, "owner notification failed");
                }
            });

            Ok(false)
        }
        None => {
            // Sandbox posture: redirect to the owner mailbox with a summary.
            let summary = EmailMessage {
                from: SANDBOX_FROM.to_string(),
                to: vec![config.owner_email.clone()],
                subject: lead.sandbox_subject.to_string(),
                text: templates::sandbox_text(lead.title, name, email, city),
                html: templates::sandbox_html(lead.title, name, email, city),
                attachments: vec![],
            };
            state.mailer.send(&summary).await?;
            Ok(true)
        }
    }
}

fn success_message(lead: &LeadConfig) -> String {
    format!("Success! Your copy of {} is on its way to your inbox.", lead.title)
}

fn json_success(message: &str, sandbox_mode: bool) -> Response {
    let mut body = json!({"success": true, "message": message});
    if sandbox_mode {
        body["sandboxMode"] = json!(true);
    }
    (StatusCode::OK, Json(body)).into_response()
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
