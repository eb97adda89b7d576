use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::core::audio::AudioError;
use crate::core::tts::TTSError;

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Tts(#[from] TTSError),

    #[error(transparent)]
    Audio(#[from] AudioError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Audio(err) => audio_status(err),
            Self::Tts(err) => match err {
                TTSError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                TTSError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                TTSError::InvalidConfiguration(_) | TTSError::InternalError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                TTSError::Audio(audio) => audio_status(audio),
                TTSError::UpstreamHttpError { .. }
                | TTSError::EmptyUpstreamResponse
                | TTSError::MalformedJsonReply(_)
                | TTSError::ModelAccessDenied { .. }
                | TTSError::UnexpectedContentType(_)
                | TTSError::NetworkError(_)
                | TTSError::InvalidPointerUrl(_) => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

fn audio_status(err: &AudioError) -> StatusCode {
    match err {
        AudioError::SampleRateUnsupported(_) => StatusCode::BAD_REQUEST,
        // Anything else came out of provider audio the pipeline could not use
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
