//! SCA API - REST server
//!
//! HTTP endpoints for analyzing sales conversation transcripts:
//! upload or post a transcript, get back the attribute report,
//! chart data, and a downloadable `extracted_information.json`.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use sca_core::AppConfig;

/// Router wired to a default rule-tagger state, for integration tests
pub fn create_router_for_testing() -> Router {
    let state = AppState::new(AppConfig::default()).expect("default analyzer state");
    create_router(Arc::new(state))
}
