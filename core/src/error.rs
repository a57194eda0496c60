use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Structured error response returned by every failing endpoint.
/// Carries enough context for a client to fix the request without guessing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiError {
    /// Machine-readable error code (e.g. "validation_failed", "not_found")
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Which field caused the error (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The value that was received (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
    /// Request ID for tracing and debugging
    pub request_id: String,
    /// Hint about what the correct usage looks like
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes used across the API
pub mod codes {
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const UPSTREAM_ERROR: &str = "upstream_error";
    pub const UPSTREAM_TIMEOUT: &str = "upstream_timeout";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const RATE_LIMITED: &str = "rate_limited";
}

/// A rejected configuration value. The configuration is never touched when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be >= 0 (received {value})")]
    NegativePhase { field: &'static str, value: f64 },

    #[error("pattern total must be > 0 (received {total})")]
    NonPositiveTotal { total: f64 },

    #[error("pattern total must be a finite number of seconds (received {total})")]
    NonFiniteTotal { total: f64 },

    #[error("{field} must be > 0 (received {value})")]
    NonPositive { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NegativePhase { field, .. } => field,
            ValidationError::NonPositiveTotal { .. } | ValidationError::NonFiniteTotal { .. } => {
                "pattern"
            }
            ValidationError::NonPositive { field, .. } => field,
        }
    }

    /// The rejected number, for echoing back to the client.
    pub fn received(&self) -> f64 {
        match self {
            ValidationError::NegativePhase { value, .. } => *value,
            ValidationError::NonPositiveTotal { total } => *total,
            ValidationError::NonFiniteTotal { total } => *total,
            ValidationError::NonPositive { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown emotion label '{0}'")]
    NotFound(String),
}
