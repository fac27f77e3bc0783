//! API error type with IntoResponse
//!
//! Every error is rendered as `{"error": "<message>"}`. The status code is
//! chosen by an exhaustive match on the variant.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::models::ValidationError;
use crate::store::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Required field missing (400)
    Validation(ValidationError),

    /// Body could not be decoded (400)
    MalformedBody { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str },

    /// Write collides with stored state (409)
    Conflict { message: String },

    /// Anything the store could not do (500, message passed through)
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::MalformedBody { message } | Self::Conflict { message } => message.clone(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Store(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if let Self::Store(e) = &self {
            tracing::error!(error = %e, "store operation failed");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::MalformedBody {
            message: e.body_text(),
        }
    }
}
