//! Core domain types and error taxonomy

pub mod error;
pub mod form;

pub use error::{
    EditRejected, GenerationFailure, NormalizeError, SubmissionError, TransportError,
};
pub use form::{FieldType, FormField, FormSchema, FormValues, SubmissionPayload};
