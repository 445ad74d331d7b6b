//! Server module for the leadgate submission-defense gateway.
//!
//! This module wires the application together: shared state construction,
//! the rate-limiter sweep background service, and server startup with
//! graceful shutdown.
//!
//! # Features
//!
//! - **State Construction**: Limiters, bot detector, and mailer built once
//!   and injected into the router, never reached through ambient globals
//! - **Background Sweep**: Periodic cleanup of expired rate-limit entries
//! - **Graceful Shutdown**: SIGINT/SIGTERM coordination across the listener
//!   and background tasks

pub mod shutdown;

use self::shutdown::{ShutdownAwareTask, ShutdownCoordinator};
use crate::AppState;
use crate::bot_detection::BotDetector;
use crate::env::AppConfig;
use crate::mailer::{Mailer, ResendMailer};
use crate::rate_limiter::{RateLimiter, SWEEP_INTERVAL_SECS};
use crate::routing::router::create_router;
use std::sync::Arc;
use tracing::{error, info};

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Build the shared application state around an injected mailer.
///
/// The mailer is a parameter so tests can substitute a recording mock; the
/// production caller passes a `ResendMailer`.
pub fn build_state(config: AppConfig, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        config: Arc::new(config),
        ip_limiter: Arc::new(RateLimiter::new()),
        email_limiter: Arc::new(RateLimiter::new()),
        detector: Arc::new(BotDetector::new()),
        mailer,
    }
}

/// Start the gateway server with graceful shutdown support
pub async fn start_server(config: AppConfig) {
    let shutdown_coordinator = Arc::new(ShutdownCoordinator::new());

    let api_key = config.resend_api_key.clone().unwrap_or_default();
    let mailer: Arc<dyn Mailer> = Arc::new(ResendMailer::new(api_key));

    let bind_address = config.bind_address;
    let state = build_state(config, mailer);

    // Start the rate-limiter sweep before accepting traffic
    start_background_services(
        state.ip_limiter.clone(),
        state.email_limiter.clone(),
        shutdown_coordinator.clone(),
    );

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    info!("Leadgate running on http://{}", addr);

    let shutdown_for_server = shutdown_coordinator.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_for_server.wait_for_shutdown_signal().await;
    });

    if let Err(err) = server.await {
        error!("Leadgate server error: {}", err);
    }

    info!("Leadgate shutdown complete");
}

///////////////////////////////////////////////////////////////////////////////
//****                      Private Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Spawn the periodic rate-limiter sweep with shutdown awareness.
///
/// The sweep bounds counter-map growth; the limiters stay correct whether or
/// not it has run recently.
fn start_background_services(
    ip_limiter: Arc<RateLimiter>,
    email_limiter: Arc<RateLimiter>,
    shutdown_coordinator: Arc<ShutdownCoordinator>,
) {
    tokio::spawn(async move {
        let mut shutdown_task = ShutdownAwareTask::new(&shutdown_coordinator);

        info!(
            interval_secs = SWEEP_INTERVAL_SECS,
            "Starting rate limit sweep background service"
        );
        loop {
            if shutdown_task
                .wait_or_shutdown(tokio::time::Duration::from_secs(SWEEP_INTERVAL_SECS))
                .await
            {
                info!("Rate limit sweep service shutting down");
                break;
            }

            let removed = ip_limiter.sweep() + email_limiter.sweep();
            if removed > 0 {
                info!(removed = removed, "Swept expired rate limit entries");
            }
        }
    });
}
