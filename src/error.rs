//! Error taxonomy for the service configuration engine.
//!
//! Every failure raised by the engine itself is a [`ServiceError`]. Call sites wrap
//! them with `anyhow::Context` so the operator sees which component or field failed,
//! while callers can still recover the root cause with `downcast_ref::<ServiceError>()`.

use crate::secrets::SecretKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Terminal or input failure while a prompt was shown
    #[error("prompt failed: {0}")]
    PromptIo(String),

    /// A stored document does not fit the expected typed shape
    #[error("service specification does not conform to schema: field '{path}' expected {expected}, found {found}")]
    SchemaMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    /// Operator supplied text that does not parse as a number
    #[error("invalid numeric value for {field}: '{value}'")]
    InvalidNumeric { field: String, value: String },

    /// A stored or supplied value is not one of the known enum members
    #[error("invalid value for {field}: '{value}'")]
    InvalidEnumChoice { field: String, value: String },

    /// Listing stored credentials failed
    #[error("failed to get secret(s) of type '{kind}': {message}")]
    SecretLookup { kind: SecretKind, message: String },

    /// A built specification violates a schema or business rule
    #[error("validation failed: {0}")]
    Validation(String),

    /// A menu returned an option outside of its fixed option list
    #[error("not supported {field}: '{choice}'")]
    UnsupportedChoice { field: String, choice: String },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

/// Find the [`ServiceError`] at the root of a wrapped error chain, if any
#[allow(dead_code)]
pub fn service_error(err: &anyhow::Error) -> Option<&ServiceError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ServiceError>())
}
