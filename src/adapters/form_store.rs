//! Form lifecycle state store
//!
//! Sole owner of the active schema and live field values. All mutation
//! is serialized through the inner lock; the only suspension point in a
//! generation cycle is the backend call between [`FormStore::begin_generation`]
//! and [`FormStore::complete_generation`].
//!
//! Each `begin_generation` issues a fresh monotonic token and clears the
//! prior schema and values immediately, so stale data is never shown as
//! current while a request is outstanding. A completion carrying any
//! other token is discarded: the most recently started cycle wins.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::adapters::submission;
use crate::domain::{
    EditRejected, FormSchema, FormValues, GenerationFailure, SubmissionError, SubmissionPayload,
};

/// Lifecycle phase of the current generation cycle.
#[derive(Debug)]
enum Phase {
    /// No prompt submitted yet
    Empty,
    /// A generation request is in flight
    Normalizing,
    /// Schema and values are available for editing and submission
    Ready {
        schema: FormSchema,
        values: FormValues,
    },
    /// The last cycle ended in an error, retained for display
    Failed { failure: GenerationFailure },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Empty => "empty",
            Phase::Normalizing => "normalizing",
            Phase::Ready { .. } => "ready",
            Phase::Failed { .. } => "failed",
        }
    }
}

struct StoreInner {
    phase: Phase,
    token: u64,
}

#[derive(Clone)]
pub struct FormStore {
    inner: Arc<RwLock<StoreInner>>,
}

/// Serializable view of the store for the API layer.
#[derive(Debug, Serialize)]
pub struct StoreSnapshot {
    pub phase: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<FormSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<FormValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl FormStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                phase: Phase::Empty,
                token: 0,
            })),
        }
    }

    /// Start a new generation cycle. Discards the prior schema and
    /// values immediately and returns the token the eventual completion
    /// must present.
    pub async fn begin_generation(&self) -> u64 {
        let mut inner = self.inner.write().await;
        inner.token += 1;
        inner.phase = Phase::Normalizing;
        inner.token
    }

    /// Commit the outcome of a generation cycle.
    ///
    /// A no-op unless `token` matches the latest `begin_generation` and
    /// the store is still `Normalizing`; a slow response from a
    /// superseded cycle cannot overwrite a newer one.
    pub async fn complete_generation(
        &self,
        token: u64,
        outcome: Result<FormSchema, GenerationFailure>,
    ) {
        let mut inner = self.inner.write().await;
        if token != inner.token {
            warn!(token, current = inner.token, "discarding stale generation result");
            return;
        }
        if !matches!(inner.phase, Phase::Normalizing) {
            return;
        }
        inner.phase = match outcome {
            Ok(schema) => Phase::Ready {
                schema,
                values: FormValues::new(),
            },
            Err(failure) => Phase::Failed { failure },
        };
    }

    /// Record a user edit. Valid only in `Ready`, and only for names the
    /// active schema declares; exactly one key is updated.
    pub async fn set_field_value(
        &self,
        name: &str,
        value: String,
    ) -> Result<(), EditRejected> {
        let mut inner = self.inner.write().await;
        match &mut inner.phase {
            Phase::Ready { schema, values } => {
                if !schema.has_field(name) {
                    return Err(EditRejected::UnknownField(name.to_string()));
                }
                values.insert(name.to_string(), value);
                Ok(())
            }
            _ => Err(EditRejected::NotReady),
        }
    }

    /// Assemble the submission payload for the active schema.
    pub async fn submit(&self) -> Result<SubmissionPayload, SubmissionError> {
        let inner = self.inner.read().await;
        match &inner.phase {
            Phase::Ready { schema, values } => submission::build(Some(schema), values),
            _ => submission::build(None, &FormValues::new()),
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read().await;
        let (schema, values, error) = match &inner.phase {
            Phase::Ready { schema, values } => {
                (Some(schema.clone()), Some(values.clone()), None)
            }
            Phase::Failed { failure } => (None, None, Some(failure.detail())),
            _ => (None, None, None),
        };
        StoreSnapshot {
            phase: inner.phase.name(),
            schema,
            values,
            error,
        }
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}
