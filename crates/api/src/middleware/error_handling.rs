//! # Error Handling Middleware
//!
//! Maps [`AgendaError`] to HTTP status codes and the JSON body every agenda
//! operation uses for failures:
//!
//! ```json
//! { "message": "Slot not found: 42", "success": false, "error_kind": "not_found" }
//! ```
//!
//! | kind                  | status |
//! |-----------------------|--------|
//! | `invalid_input`       | 400    |
//! | `not_found`           | 404    |
//! | `constraint_violation`| 409    |
//! | `storage`             | 500    |
//! | `dependency`          | 502    |

use agenda_core::errors::{AgendaError, ErrorKind};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// Handlers return `Result<Json<T>, AppError>` and use `?` on engine calls.
#[derive(Debug)]
pub struct AppError(pub AgendaError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::ConstraintViolation => StatusCode::CONFLICT,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::Dependency => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            // Debug output carries the whole cause chain
            error!("Request failed: {:?}", self.0);
        }

        let body = Json(json!({
            "message": self.0.to_string(),
            "success": false,
            "error_kind": self.0.kind().as_str(),
        }));

        (status, body).into_response()
    }
}

/// Automatic conversion from AgendaError to AppError
impl From<AgendaError> for AppError {
    fn from(err: AgendaError) -> Self {
        AppError(err)
    }
}
