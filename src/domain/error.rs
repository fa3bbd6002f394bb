//! Error types for the form generation pipeline
//!
//! Errors cross component boundaries as values, never as panics. Each
//! enum covers one concern: transport (the backend call), normalization
//! (interpreting the response), editing, and submission.

use serde_json::{json, Value};
use thiserror::Error;

/// Errors from the generation backend call itself.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Backend returned a non-success HTTP status
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API key missing or rejected
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Connection-level failure
    #[error("network error: {0}")]
    Network(String),

    /// Response envelope could not be read
    #[error("parse error: {0}")]
    Parse(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Network(format!("connection error: {}", err))
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Failure to interpret a backend response as a form schema.
///
/// Every variant retains the offending raw input for diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// An embedded string attribute did not decode as JSON
    #[error("embedded payload unparseable")]
    EmbeddedPayloadUnparseable { raw: String },

    /// No decode strategy claimed the input
    #[error("unrecognized format")]
    Unrecognized { raw: Value },

    /// Two fields share one name
    #[error("duplicate field name: {name}")]
    DuplicateField { name: String, raw: Value },

    /// A field entry is malformed (missing name/label, wrong types)
    #[error("invalid field definition: {detail}")]
    InvalidField { detail: String, raw: Value },
}

impl NormalizeError {
    /// Short machine-readable reason, stable across message wording.
    pub fn reason(&self) -> &'static str {
        match self {
            NormalizeError::EmbeddedPayloadUnparseable { .. } => "embedded payload unparseable",
            NormalizeError::Unrecognized { .. } => "unrecognized format",
            NormalizeError::DuplicateField { .. } => "duplicate field name",
            NormalizeError::InvalidField { .. } => "invalid field definition",
        }
    }

    /// The raw input that failed to normalize.
    pub fn raw(&self) -> Value {
        match self {
            NormalizeError::EmbeddedPayloadUnparseable { raw } => Value::String(raw.clone()),
            NormalizeError::Unrecognized { raw }
            | NormalizeError::DuplicateField { raw, .. }
            | NormalizeError::InvalidField { raw, .. } => raw.clone(),
        }
    }
}

/// Why a generation cycle ended in the `Failed` phase.
#[derive(Debug, Clone, Error)]
pub enum GenerationFailure {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("normalization: {0}")]
    Normalization(#[from] NormalizeError),
}

impl GenerationFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationFailure::Transport(_) => "transport",
            GenerationFailure::Normalization(_) => "normalization",
        }
    }

    /// Diagnostic detail for API snapshots, including the raw payload
    /// where one was retained.
    pub fn detail(&self) -> Value {
        match self {
            GenerationFailure::Transport(e) => json!({
                "kind": "transport",
                "message": e.to_string(),
            }),
            GenerationFailure::Normalization(e) => json!({
                "kind": "normalization",
                "reason": e.reason(),
                "raw": e.raw(),
            }),
        }
    }
}

/// Rejection of a field edit by the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditRejected {
    /// No form is in the `Ready` phase
    #[error("no form is ready for editing")]
    NotReady,

    /// The active schema declares no field with this name
    #[error("unknown field: {0}")]
    UnknownField(String),
}

/// Rejection of a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("no active schema")]
    NoActiveSchema,
}
