use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// ApiError
///
/// The crate-wide error taxonomy. Every handler returns `Result<_, ApiError>`,
/// and the `IntoResponse` impl below is the single place where errors become
/// HTTP responses, always as a JSON `{"error": "..."}` body:
///
/// - `InvalidCredentials` → 401 (login failures; deliberately does not say which half was wrong)
/// - `NotFound` → 404 (update/delete on a nonexistent id, or a missing parent on insert)
/// - `Validation` → 400 (missing required fields, non-positive sprint numbers, bad date strings)
/// - everything else → 500, logged server-side with the full error, generic message to the caller
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) | ApiError::PasswordHash(_) | ApiError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // The underlying error stays in the server logs; the caller gets a generic message.
            tracing::error!("request failed: {:?}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
