//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::listing::{ListingError, ParamError};
use crate::store::StoreError;

/// Result alias for handlers
pub type ApiResult<T> = std::result::Result<T, AppError>;

/// Original cause of a 5xx response, attached as a response extension so
/// the audit layer can record it without exposing it to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditCause(pub String);

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid parameter '{parameter}': {message}")]
    Validation { parameter: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) | Self::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Store(StoreError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ParamError> for AppError {
    fn from(err: ParamError) -> Self {
        Self::Validation {
            parameter: err.parameter,
            message: err.message,
        }
    }
}

impl From<ListingError> for AppError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::Param(e) => e.into(),
            ListingError::Store(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let (body, cause) = match self {
            AppError::Validation { parameter, .. } => (
                ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    message,
                    json!({ "parameter": parameter }),
                ),
                None,
            ),
            AppError::NotFound(_) | AppError::Store(StoreError::NotFound { .. }) => {
                (ErrorResponse::new("NOT_FOUND", message), None)
            },
            AppError::BadRequest(_) => (ErrorResponse::new("BAD_REQUEST", message), None),
            AppError::Store(StoreError::Conflict(_)) => {
                (ErrorResponse::new("CONFLICT", message), None)
            },
            AppError::Store(StoreError::Backend(ref cause)) => {
                tracing::error!(error = %cause, "Store error");
                (
                    ErrorResponse::new("INTERNAL_ERROR", "A store error occurred"),
                    Some(AuditCause(message)),
                )
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(cause) = cause {
            response.extensions_mut().insert(cause);
        }
        response
    }
}
