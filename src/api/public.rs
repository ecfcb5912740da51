//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::availability::AvailabilityError;

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        self.0
            .downcast_ref::<AvailabilityError>()
            .map(AvailabilityError::status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }

        let message = if status.is_server_error() {
            format!("Something went wrong: {}", self.0)
        } else {
            self.0.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod calendar {
    pub use crate::api::routes::calendar::public::*;
}

pub mod clubs {
    pub use crate::api::routes::clubs::public::*;
}
