//! Typed error handling for the flatboard service
//!
//! This module provides the error hierarchy surfaced by the HTTP layer.
//! Every error knows its HTTP status code and serializes into the uniform
//! `{"data": {...}}` response envelope.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: missing or malformed apartment fields (400)
//! - [`FilterError`]: bad filter descriptors (400)
//! - `ApiError::NotFound`: unknown identifiers (404)
//! - [`StoreError`]: entity-store failures (500)
//! - [`MediaError`]: media write/read failures (500, or 404 for a missing image)

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::fmt;

use crate::apartments::store::StoreError;
use crate::media::store::MediaError;

/// The main error type for the flatboard service
///
/// Each variant wraps a more specific error for that category. Handlers
/// return `Result<_, ApiError>` and rely on the single `IntoResponse`
/// implementation for status mapping and envelope shape.
#[derive(Debug)]
pub enum ApiError {
    /// Apartment payload validation errors
    Validation(ValidationError),

    /// Filter descriptor parsing errors
    Filter(FilterError),

    /// Unknown identifier (apartment or image)
    NotFound { resource: &'static str },

    /// Entity store failures
    Storage(StoreError),

    /// Media store failures
    Media(MediaError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Filter(e) => write!(f, "{}", e),
            ApiError::NotFound { resource } => write!(f, "{} not found", resource),
            ApiError::Storage(e) => write!(f, "{}", e),
            ApiError::Media(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            ApiError::Filter(e) => Some(e),
            ApiError::NotFound { .. } => None,
            ApiError::Storage(e) => Some(e),
            ApiError::Media(e) => Some(e),
        }
    }
}

impl ApiError {
    /// Shorthand for an unknown apartment identifier
    pub fn apartment_not_found() -> Self {
        ApiError::NotFound {
            resource: "Apartment",
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Filter(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Media(MediaError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the `data` payload carried inside the response envelope
    ///
    /// Shapes match the wire contract: validation failures answer
    /// `{"message": "Missing argument", "err": ...}`, store failures
    /// `{"message": "Internal Error", "error": ...}`, and so on.
    fn payload(&self) -> Value {
        match self {
            ApiError::Validation(e) => json!({
                "message": "Missing argument",
                "err": e.to_string(),
            }),
            ApiError::Filter(e) => json!({
                "message": e.to_string(),
            }),
            ApiError::NotFound { resource } => json!({
                "message": format!("{} not found", resource),
            }),
            ApiError::Storage(e) => json!({
                "message": "Internal Error",
                "error": e.to_string(),
            }),
            ApiError::Media(e) => match e {
                MediaError::NotFound { .. } => json!({
                    "message": "Image not found",
                }),
                MediaError::BatchWrite { .. } => json!({
                    "message": "Error while uploading file",
                }),
                MediaError::Io(_) => json!({
                    "message": "Internal Error",
                    "error": e.to_string(),
                }),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "data": self.payload() }));
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised while validating an apartment creation payload
///
/// These are detected before any persistence attempt; a failed validation
/// never partially mutates state.
#[derive(Debug)]
pub enum ValidationError {
    /// A required field is absent or null
    MissingArgument { argument: String },

    /// A field is present but has the wrong shape or type
    InvalidField { field: String, message: String },

    /// The request body itself could not be decoded
    InvalidBody { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingArgument { argument } => {
                write!(f, "missing required field '{}'", argument)
            }
            ValidationError::InvalidField { field, message } => {
                write!(f, "invalid value for field '{}': {}", field, message)
            }
            ValidationError::InvalidBody { message } => {
                write!(f, "invalid request body: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

// =============================================================================
// Filter Errors
// =============================================================================

/// Errors raised while decoding client-supplied filter descriptors
///
/// All variants surface as client errors, never as store-level failures.
#[derive(Debug)]
pub enum FilterError {
    /// Descriptor is not parseable JSON or not a descriptor object
    Malformed { message: String },

    /// Descriptor references a field that is not a filterable attribute
    UnknownField { field: String },

    /// Descriptor uses an operator outside the recognized set
    UnknownOperator { operator: String },

    /// Descriptor value does not coerce to a number
    NonNumericValue { field: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::Malformed { message } => {
                write!(f, "malformed filter: {}", message)
            }
            FilterError::UnknownField { field } => {
                write!(f, "unknown filter field '{}'", field)
            }
            FilterError::UnknownOperator { operator } => {
                write!(f, "unknown filter operator '{}'", operator)
            }
            FilterError::NonNumericValue { field } => {
                write!(f, "non-numeric filter value for field '{}'", field)
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        ApiError::Filter(err)
    }
}

// =============================================================================
// Conversions from component errors
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Storage(err)
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        ApiError::Media(err)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_error_status_code() {
        let err: ApiError = ValidationError::MissingArgument {
            argument: "price".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_error_payload_shape() {
        let err: ApiError = ValidationError::MissingArgument {
            argument: "sqm".to_string(),
        }
        .into();
        let payload = err.payload();
        assert_eq!(payload["message"], "Missing argument");
        assert!(payload["err"].as_str().unwrap().contains("sqm"));
    }

    #[test]
    fn test_filter_error_status_code() {
        let err: ApiError = FilterError::UnknownOperator {
            operator: "!=".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("!="));
    }

    #[test]
    fn test_not_found_payload() {
        let err = ApiError::apartment_not_found();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.payload()["message"], "Apartment not found");
    }

    #[test]
    fn test_storage_error_maps_to_500() {
        let err: ApiError = StoreError::Unavailable {
            message: "lock poisoned".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.payload()["message"], "Internal Error");
    }

    #[test]
    fn test_missing_image_maps_to_404() {
        let err: ApiError = MediaError::NotFound {
            apartment_id: Uuid::nil(),
            index: 3,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_batch_write_failure_payload() {
        let err: ApiError = MediaError::BatchWrite {
            apartment_id: Uuid::nil(),
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.payload()["message"], "Error while uploading file");
    }
}
