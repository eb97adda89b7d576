//! Provider-agnostic synthesis contract: errors, requests, classified
//! replies and the [`ProviderAdapter`] trait every backend implements.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

use crate::core::audio::{AudioError, SampleRate};

/// Characters of request text that may appear in logs.
pub const LOG_TEXT_PREVIEW_CHARS: usize = 100;

/// Upstream bodies kept in errors are cut to this many characters.
pub const ERROR_BODY_PREVIEW_CHARS: usize = 512;

/// TTS provider errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TTSError {
    /// Non-200 from the provider or from the audio pointer download
    #[error("Upstream HTTP error {status}: {body}")]
    UpstreamHttpError { status: u16, body: String },

    #[error("Upstream returned an empty response body")]
    EmptyUpstreamResponse,

    /// JSON reply without a usable `audioUrl`
    #[error("Malformed JSON reply: {0}")]
    MalformedJsonReply(String),

    /// The provider refused the requested synthesis model
    #[error("Access denied for model '{model}': {body}")]
    ModelAccessDenied { model: String, body: String },

    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid audio URL: {0}")]
    InvalidPointerUrl(String),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type for TTS operations
pub type TTSResult<T> = Result<T, TTSError>;

impl TTSError {
    /// Map a `reqwest` transport failure.
    pub fn from_request_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

/// First `max_chars` characters of `text`, for logs and error bodies.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Supported upstream synthesis services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Cloud Text-to-Speech REST API (API key auth)
    GoogleRest,
    Deepdub,
    ElevenLabs,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 3] = [
        ProviderKind::GoogleRest,
        ProviderKind::Deepdub,
        ProviderKind::ElevenLabs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GoogleRest => "google",
            Self::Deepdub => "deepdub",
            Self::ElevenLabs => "elevenlabs",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "google-rest" | "google_rest" | "gcp" => Ok(Self::GoogleRest),
            "deepdub" | "deep-dub" => Ok(Self::Deepdub),
            "elevenlabs" | "eleven-labs" | "eleven_labs" | "11labs" => Ok(Self::ElevenLabs),
            _ => Err(format!(
                "Unsupported TTS provider: {s}. Supported providers: google, deepdub, elevenlabs"
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One synthesis call as seen by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub sample_rate: SampleRate,
    /// Overrides the adapter's configured voice when set
    pub voice_ref: Option<String>,
}

impl SynthesisRequest {
    /// Rejects blank text.
    pub fn new(text: impl Into<String>, sample_rate: SampleRate) -> TTSResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TTSError::InvalidRequest("text must not be empty".to_string()));
        }
        Ok(Self {
            text,
            sample_rate,
            voice_ref: None,
        })
    }

    pub fn with_voice(mut self, voice_ref: impl Into<String>) -> Self {
        self.voice_ref = Some(voice_ref.into());
        self
    }

    pub fn text_preview(&self) -> &str {
        preview(&self.text, LOG_TEXT_PREVIEW_CHARS)
    }
}

/// Why a reply was classified as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyErrorCause {
    /// Status other than 200
    HttpStatus,
    /// 200 with a zero-length body
    EmptyBody,
    /// JSON that does not carry an audio pointer
    MalformedJson(String),
    /// Neither the declared type nor the bytes look like audio
    UnexpectedContentType(String),
}

/// A provider response, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderReply {
    InlineAudio { bytes: Bytes, content_type: String },
    AudioPointer { url: String },
    Error {
        status: u16,
        body: String,
        cause: ReplyErrorCause,
    },
}

impl ProviderReply {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Convert an error reply to the matching [`TTSError`].
    ///
    /// Non-error replies yield `InternalError`; callers only use this on
    /// replies they already know to be errors.
    pub fn into_error(self) -> TTSError {
        match self {
            Self::Error {
                status,
                body,
                cause,
            } => match cause {
                ReplyErrorCause::HttpStatus => TTSError::UpstreamHttpError { status, body },
                ReplyErrorCause::EmptyBody => TTSError::EmptyUpstreamResponse,
                ReplyErrorCause::MalformedJson(detail) => TTSError::MalformedJsonReply(detail),
                ReplyErrorCause::UnexpectedContentType(content_type) => {
                    TTSError::UnexpectedContentType(content_type)
                }
            },
            other => TTSError::InternalError(format!("reply is not an error: {other:?}")),
        }
    }
}

/// Does this error reply mean "you may not use that model"?
///
/// 401/403 whose body mentions `model`, e.g. `model_access_denied` or
/// "You do not have access to model ...".
pub fn is_model_denial(reply: &ProviderReply) -> bool {
    match reply {
        ProviderReply::Error {
            status,
            body,
            cause: ReplyErrorCause::HttpStatus,
        } => matches!(status, 401 | 403) && body.to_lowercase().contains("model"),
        _ => false,
    }
}

/// Submit text to one upstream service and classify its answer.
///
/// Adapters only talk HTTP; normalization and retries happen in the
/// orchestrator.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Model used for the first attempt, if the provider has a model axis
    fn primary_model(&self) -> Option<&str>;

    /// Model tried once after a model access denial
    fn fallback_model(&self) -> Option<&str>;

    /// Send one synthesis request with `model` (ignored by providers
    /// without models).
    ///
    /// Upstream failures come back as `Ok(ProviderReply::Error { .. })`; `Err`
    /// is reserved for transport failures and local problems.
    async fn submit(&self, request: &SynthesisRequest, model: Option<&str>)
    -> TTSResult<ProviderReply>;

    fn is_model_access_denied(&self, reply: &ProviderReply) -> bool {
        is_model_denial(reply)
    }

    fn provider_info(&self) -> serde_json::Value;
}
