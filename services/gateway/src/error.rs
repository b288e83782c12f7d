use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kraken_signing::SigningError;
use thiserror::Error;
use types::envelope::ResultEnvelope;

pub const MISSING_CREDENTIALS_MESSAGE: &str = "API key and secret are required.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error while contacting Kraken.";
pub const UPSTREAM_FAILED_MESSAGE: &str = "Kraken API request failed.";

/// Central error type for the Gateway application.
///
/// Display strings are for server logs; callers only ever see
/// [`AppError::public_message`]. Neither includes the API secret.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing API key or secret")]
    MissingCredentials,

    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    #[error("Kraken transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Kraken returned HTTP {status}: {message}")]
    UpstreamStatus { status: StatusCode, message: String },

    #[error("Kraken rejected the request: {0}")]
    UpstreamRejected(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredentials
            | AppError::InvalidPayload(_)
            | AppError::UpstreamRejected(_) => StatusCode::BAD_REQUEST,
            AppError::Signing(_) | AppError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamStatus { status, .. } => *status,
        }
    }

    /// Message placed in the response envelope.
    pub fn public_message(&self) -> String {
        match self {
            AppError::MissingCredentials => MISSING_CREDENTIALS_MESSAGE.to_string(),
            AppError::InvalidPayload(msg) => msg.clone(),
            // Signing and transport details stay in the server log
            AppError::Signing(_) | AppError::Transport(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
            AppError::UpstreamStatus { message, .. } => message.clone(),
            AppError::UpstreamRejected(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Signing(_) | AppError::Transport(_) => {
                tracing::error!(status = status.as_u16(), error = %self, "[kraken-connect] error");
            }
            _ => {
                tracing::warn!(status = status.as_u16(), error = %self, "[kraken-connect] rejected");
            }
        }

        let body = Json(ResultEnvelope::failure(self.public_message()));
        (status, body).into_response()
    }
}
