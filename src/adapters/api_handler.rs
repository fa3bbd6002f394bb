//! REST API handlers for the form lifecycle
//!
//! One generation cycle per `POST /api/form/generate`: begin, call the
//! backend, normalize, commit. Edits and submission are synchronous
//! against the latest committed state. Errors travel back to the
//! presentation layer inside the response envelope; turning them into
//! user-visible messages is the frontend's job.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::adapters::form_store::FormStore;
use crate::adapters::generation_client::GenerationClient;
use crate::adapters::normalizer::normalize;
use crate::domain::{EditRejected, GenerationFailure, SubmissionPayload};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: FormStore,
    pub client: Arc<dyn GenerationClient>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldValueRequest {
    pub value: String,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

/// POST /api/form/generate
///
/// Runs one full generation cycle and returns the resulting store
/// snapshot, whether the cycle ended `Ready` or `Failed`.
pub async fn generate_form(
    State(state): State<ApiState>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let token = state.store.begin_generation().await;

    let outcome = match state.client.generate(&req.prompt).await {
        Ok(raw) => match normalize(&raw) {
            Ok(schema) => {
                info!(fields = schema.fields.len(), "generated form schema");
                Ok(schema)
            }
            Err(e) => {
                warn!(reason = e.reason(), "response failed normalization");
                Err(GenerationFailure::from(e))
            }
        },
        Err(e) => {
            error!(error = %e, "generation request failed");
            Err(GenerationFailure::from(e))
        }
    };

    state.store.complete_generation(token, outcome).await;
    let snapshot = state.store.snapshot().await;
    (StatusCode::OK, Json(ApiResponse::success(snapshot)))
}

/// GET /api/form
pub async fn get_form(State(state): State<ApiState>) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;
    (StatusCode::OK, Json(ApiResponse::success(snapshot)))
}

/// PUT /api/form/fields/:name
pub async fn set_field_value(
    State(state): State<ApiState>,
    Path(name): Path<String>,
    Json(req): Json<FieldValueRequest>,
) -> impl IntoResponse {
    match state.store.set_field_value(&name, req.value).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok())),
        Err(e @ EditRejected::UnknownField(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(e.to_string())),
        ),
        Err(e @ EditRejected::NotReady) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

/// POST /api/form/submit
pub async fn submit_form(State(state): State<ApiState>) -> impl IntoResponse {
    match state.store.submit().await {
        Ok(payload) => {
            info!(fields = payload.len(), "form submitted");
            (StatusCode::OK, Json(ApiResponse::success(payload)))
        }
        Err(e) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<SubmissionPayload>::error(e.to_string())),
        ),
    }
}
