//! Request-level error kinds and their HTTP mapping.
//!
//! Every failure leaves a handler as an [`AppError`] and is rendered as the
//! uniform `{success:false, error}` envelope. Store errors carry the raw
//! driver message.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::model::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Todo not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// An id that cannot name a todo is reported the same way as a missing one.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "unusable todo id");
        AppError::NotFound
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(e) => tracing::error!(error = %e, "store operation failed"),
            other => tracing::debug!(error = %other, "request rejected"),
        }
        let body = Envelope::<()>::error(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
