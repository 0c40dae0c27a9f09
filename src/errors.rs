// src/errors.rs
// DOCUMENTATION: Custom error types for validation and persistence
// PURPOSE: Centralized error handling for the review model

use serde::Serialize;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Value has the wrong JSON type (e.g. rating given as text)
    Type,
    /// Numeric value outside its allowed range
    Range,
    /// Textual value that is not a well-formed identifier
    Format,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationKind::Type => "type",
            ViolationKind::Range => "range",
            ViolationKind::Format => "format",
        };
        f.write_str(name)
    }
}

/// One rejected field of a review candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation failure for a review candidate
/// DOCUMENTATION: Carries every violated field, never empty
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    pub(crate) fn single(violation: FieldViolation) -> Self {
        Self::new(vec![violation])
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// First violation reported for `field`, if any
    pub fn violation_for(&self, field: &str) -> Option<&FieldViolation> {
        self.violations.iter().find(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failures reported by the document-store collaborator
/// DOCUMENTATION: Surfaced to callers unchanged, never retried here
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Review not found: {0}")]
    NotFound(String),

    #[error("Store conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound("no matching row".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(ref db)
                if db.is_unique_violation() || db.is_check_violation() =>
            {
                StoreError::Conflict(db.message().to_string())
            }
            other => StoreError::Database(other.to_string()),
        }
    }
}

/// Application-level error returned by the review service
#[derive(Error, Debug)]
pub enum ReviewsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ReviewsError {
    /// HTTP-style status code for outer layers that need one
    pub fn status_code(&self) -> u16 {
        match self {
            ReviewsError::Validation(_) => 400,
            ReviewsError::Store(StoreError::NotFound(_)) => 404,
            ReviewsError::Store(StoreError::Conflict(_)) => 409,
            ReviewsError::Store(StoreError::Unavailable(_)) => 503,
            ReviewsError::Store(StoreError::Database(_)) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ReviewsError::Validation(_) => "VALIDATION_ERROR",
            ReviewsError::Store(StoreError::NotFound(_)) => "NOT_FOUND",
            ReviewsError::Store(StoreError::Conflict(_)) => "CONFLICT",
            ReviewsError::Store(StoreError::Unavailable(_)) => "SERVICE_UNAVAILABLE",
            ReviewsError::Store(StoreError::Database(_)) => "DATABASE_ERROR",
        }
    }

    /// JSON error body in the shape `{"error": {code, message, timestamp, violations}}`
    pub fn to_body(&self) -> Value {
        let violations = match self {
            ReviewsError::Validation(e) => json!(e.violations()),
            ReviewsError::Store(_) => json!([]),
        };

        json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "violations": violations
            }
        })
    }
}
