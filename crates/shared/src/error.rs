use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Internal,
}

/// JSON error body returned by the contact relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub fields: FieldErrors,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }
}

impl From<ValidationFailure> for ApiError {
    fn from(value: ValidationFailure) -> Self {
        Self {
            code: ErrorCode::Validation,
            message: value.to_string(),
            fields: value.errors,
        }
    }
}

/// One or more fields violate their rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} contact field(s) failed validation", errors.len())]
pub struct ValidationFailure {
    pub errors: FieldErrors,
}

impl ValidationFailure {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }
}

/// The external send operation did not deliver the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionFailure {
    #[error("contact endpoint rejected the message ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("contact endpoint unreachable: {0}")]
    Transport(String),
    #[error("submission was cancelled before it completed")]
    Cancelled,
}
