//! # Formgen - Prompt-to-Form Generation Service
//!
//! Formgen turns a free-text prompt into a rendered, fillable form. A
//! prompt goes to a generation backend (Google Gemini), the backend's
//! response is normalized into a canonical [`domain::FormSchema`], and
//! user edits plus submission are governed by a single state store.
//!
//! ## Features
//!
//! - **Schema normalization**: canonical, wrapped (`raw_output`) and
//!   doubly-encoded backend responses reconciled by priority-ordered
//!   decode strategies
//! - **Lifecycle store**: `Empty -> Normalizing -> Ready | Failed` with
//!   token-based suppression of stale in-flight responses
//! - **Submission building**: every schema field exactly once, in
//!   schema order, untouched fields as empty strings
//! - **Health checks**: Kubernetes-ready health endpoints
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use formgen::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration
//!     let settings = Settings::new()?;
//!
//!     // Server will start on configured host:port
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Formgen follows Hexagonal Architecture:
//! - **Domain**: schema types and error taxonomy
//! - **Adapters**: normalizer, store, submission builder, backend client,
//!   HTTP handlers
//! - **Config**: configuration management

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(api_state: ApiState, health_handler: Arc<HealthHandler>) -> Router {
    // Health check endpoints
    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    // Form lifecycle API
    let api_router = Router::new()
        .route("/form/generate", post(api_handler::generate_form))
        .route("/form", get(api_handler::get_form))
        .route("/form/fields/:name", put(api_handler::set_field_value))
        .route("/form/submit", post(api_handler::submit_form))
        .with_state(api_state);

    let router = health_router.nest("/api", api_router);

    router.layer(
        tower_http::cors::CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
    )
}
