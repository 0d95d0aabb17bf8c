//! # Error Handling
//!
//! Two kinds of failure leave this crate:
//!
//! - [`CodecError`]: a structured query field could not be decoded. Query
//!   state is produced by this crate, so a corrupt value means someone edited
//!   the URL by hand or a caller has a bug. It is never silently replaced by
//!   "no filter".
//! - [`ApiError`]: the HTTP-facing error returned by extractors and handlers.
//!   It maps to a status code, sends a sanitized body and logs internal
//!   details through `tracing`.
//!
//! Validation failures are not errors in the exceptional sense; they are
//! returned as [`ValidationErrors`](crate::validation::ValidationErrors) and
//! only become an [`ApiError`] when a handler decides to reject the request.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hirequery::{ApiError, SearchQuery, SearchSurface};
//! use hirequery::surfaces::VacancySearch;
//!
//! async fn search(query: SearchQuery<VacancySearch>) -> Result<Json<Value>, ApiError> {
//!     // malformed query strings were already rejected with 400 by the extractor
//!     let payload = query.payload()?; // 422 with per-field messages
//!     Ok(Json(Value::Object(payload)))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

/// Failure to decode a query-string value into its declared form type.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("query field '{field}' is not valid JSON: {source}")]
    MalformedJson {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("query field '{field}' is not a number: '{value}'")]
    InvalidNumber { field: String, value: String },

    #[error("query field '{field}' is not a boolean: '{value}'")]
    InvalidFlag { field: String, value: String },
}

impl CodecError {
    /// Name of the query field that failed to decode
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MalformedJson { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::InvalidFlag { field, .. } => field,
        }
    }
}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - The request could not be decoded
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - One or more fields failed validation
    ValidationFailed {
        /// Field name to message
        errors: ValidationErrors,
    },

    /// 500 Internal Server Error - Generic internal error
    Internal {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    /// Create a 400 Bad Request error
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a 422 Validation Failed error
    #[must_use]
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Create a 500 Internal Server Error with optional details
    #[must_use]
    pub fn internal(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } | Self::Internal { message, .. } => message.clone(),
            Self::ValidationFailed { errors } => {
                if errors.len() == 1 {
                    errors
                        .iter()
                        .next()
                        .map(|(_, message)| message.to_string())
                        .unwrap_or_default()
                } else {
                    format!("Validation failed for {} fields", errors.len())
                }
            }
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Internal {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Field name to validation message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();

        let response = match &self {
            Self::ValidationFailed { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                fields: Some(errors.clone().into_map()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                fields: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<CodecError> for ApiError {
    fn from(err: CodecError) -> Self {
        tracing::warn!(field = %err.field(), error = %err, "Rejected malformed search query");
        Self::bad_request(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation_failed(errors)
    }
}
