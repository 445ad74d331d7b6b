
//! # Router Module
//!
//! This module builds the axum router for the submission-defense gateway:
//! one POST route per lead magnet, a health probe, shared application state,
//! and the HTTP tracing layer.

use super::handlers::{handle_subscribe, handle_subscribe_catluker};
use crate::AppState;
use axum::{Router, routing::{get, post}};
use tower_http::trace::TraceLayer;

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/subscribe", post(handle_subscribe))
        .route("/api/subscribe-catluker", post(handle_subscribe_catluker))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

///////////////////////////////////////////////////////////////////////////////
//****                              Tests                                ****//
///////////////////////////////////////////////////////////////////////////////
// End-to-end tests for the router live in tests/integration.rs
