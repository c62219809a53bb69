use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::card::ClaimRejection;
use crate::form::{SubmitError, ValidationError};
use crate::schema::ActionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Claim(#[from] ClaimRejection),

    #[error("Lucky packet program is not configured")]
    NotConfigured,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Account decode failed: {0}")]
    Decode(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::Claim(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Rpc(_) | AppError::Decode(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Invalid(invalid) => AppError::Validation(invalid),
            busy @ SubmitError::Busy => AppError::BadRequest(busy.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("{self}");
        }

        let body = ActionError {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
