//! Classification of raw provider responses.
//!
//! Providers answer a synthesis call with binary audio, a JSON document
//! pointing at a file to download, or an error, and they are not consistent
//! about labelling which is which (binary audio arrives as `text/plain`).
//! [`ResponseDispatcher::classify`] decides once from status, content type
//! and magic bytes; [`ResponseDispatcher::dispatch`] additionally downloads
//! pointed-at audio.

use bytes::Bytes;
use http::HeaderMap;
use http::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::base::{
    ERROR_BODY_PREVIEW_CHARS, ProviderReply, ReplyErrorCause, TTSError, TTSResult, preview,
};
use crate::core::audio::format::{AudioFormat, sniff_bytes};
use crate::core::audio::types::{AudioBuffer, normalize_content_type};
use crate::utils::validate_audio_url;

/// Status, headers and body of one upstream response, fully read.
#[derive(Debug, Clone)]
pub struct RawHttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawHttpResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Drain a `reqwest` response.
    pub async fn from_reqwest(response: reqwest::Response) -> TTSResult<Self> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(TTSError::from_request_error)?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Lowercased media type without parameters, empty when absent.
    pub fn content_type(&self) -> String {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(normalize_content_type)
            .unwrap_or_default()
    }

    fn body_preview(&self) -> String {
        preview(&String::from_utf8_lossy(&self.body), ERROR_BODY_PREVIEW_CHARS).to_string()
    }

    fn error(&self, cause: ReplyErrorCause) -> ProviderReply {
        ProviderReply::Error {
            status: self.status,
            body: self.body_preview(),
            cause,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AudioPointerJson {
    #[serde(rename = "audioUrl")]
    audio_url: Option<String>,
}

/// Turns upstream responses into [`ProviderReply`] values.
#[derive(Debug, Clone)]
pub struct ResponseDispatcher {
    client: reqwest::Client,
    /// Accept pointers at loopback hosts (local development only)
    allow_localhost: bool,
}

impl ResponseDispatcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            allow_localhost: false,
        }
    }

    pub fn with_localhost_allowed(mut self, allow_localhost: bool) -> Self {
        self.allow_localhost = allow_localhost;
        self
    }

    /// Classify without any network access.
    pub fn classify(response: &RawHttpResponse) -> ProviderReply {
        if response.status != 200 {
            warn!(
                status = response.status,
                body = %response.body_preview(),
                "Provider returned error status"
            );
            return response.error(ReplyErrorCause::HttpStatus);
        }
        if response.body.is_empty() {
            return response.error(ReplyErrorCause::EmptyBody);
        }

        let content_type = response.content_type();
        if content_type == "application/json" || content_type.ends_with("+json") {
            return Self::parse_pointer(response);
        }
        if content_type.starts_with("audio/") || content_type == "text/plain" {
            return ProviderReply::InlineAudio {
                bytes: response.body.clone(),
                content_type,
            };
        }

        // Unlabelled or generic binary: look at the bytes.
        match sniff_bytes(&response.body) {
            AudioFormat::Wav => ProviderReply::InlineAudio {
                bytes: response.body.clone(),
                content_type: "audio/wav".to_string(),
            },
            AudioFormat::Mp3 => ProviderReply::InlineAudio {
                bytes: response.body.clone(),
                content_type: "audio/mpeg".to_string(),
            },
            AudioFormat::Json => Self::parse_pointer(response),
            AudioFormat::Unknown => {
                let label = if content_type.is_empty() {
                    "<missing>".to_string()
                } else {
                    content_type
                };
                response.error(ReplyErrorCause::UnexpectedContentType(label))
            }
        }
    }

    fn parse_pointer(response: &RawHttpResponse) -> ProviderReply {
        match serde_json::from_slice::<AudioPointerJson>(&response.body) {
            Ok(AudioPointerJson {
                audio_url: Some(url),
            }) if !url.trim().is_empty() => ProviderReply::AudioPointer { url },
            Ok(_) => response.error(ReplyErrorCause::MalformedJson(
                "JSON reply has no audioUrl field".to_string(),
            )),
            Err(e) => response.error(ReplyErrorCause::MalformedJson(format!(
                "JSON reply could not be parsed: {e}"
            ))),
        }
    }

    /// Classify `response` and resolve an audio pointer with one GET.
    ///
    /// Provider-side failures are returned as `Ok(ProviderReply::Error)`.
    /// A failed pointer download is a hard error and is not retried.
    pub async fn dispatch(&self, response: RawHttpResponse) -> TTSResult<ProviderReply> {
        match Self::classify(&response) {
            ProviderReply::AudioPointer { url } => {
                let buffer = self.fetch_pointer(&url).await?;
                Ok(ProviderReply::InlineAudio {
                    content_type: buffer
                        .declared_content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string(),
                    bytes: buffer.bytes().clone(),
                })
            }
            reply => Ok(reply),
        }
    }

    /// Download the audio a JSON reply pointed at.
    pub async fn fetch_pointer(&self, url: &str) -> TTSResult<AudioBuffer> {
        let url = validate_audio_url(url, self.allow_localhost)
            .map_err(|e| TTSError::InvalidPointerUrl(e.to_string()))?;
        info!(url = %url, "Fetching audio from provider URL");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(TTSError::from_request_error)?;
        let raw = RawHttpResponse::from_reqwest(response).await?;

        if raw.status != 200 {
            warn!(url = %url, status = raw.status, "Audio download failed");
            return Err(TTSError::UpstreamHttpError {
                status: raw.status,
                body: raw.body_preview(),
            });
        }
        if raw.body.is_empty() {
            return Err(TTSError::EmptyUpstreamResponse);
        }

        debug!(url = %url, bytes = raw.body.len(), "Downloaded audio");
        let content_type = raw.content_type();
        let buffer = AudioBuffer::new(raw.body);
        Ok(if content_type.is_empty() {
            buffer
        } else {
            buffer.with_content_type(content_type)
        })
    }
}

/// Turn a resolved reply into pipeline input.
pub fn reply_into_audio(reply: ProviderReply) -> TTSResult<AudioBuffer> {
    match reply {
        ProviderReply::InlineAudio {
            bytes,
            content_type,
        } => Ok(AudioBuffer::new(bytes).with_content_type(content_type)),
        ProviderReply::AudioPointer { url } => Err(TTSError::InternalError(format!(
            "audio pointer {url} was not resolved"
        ))),
        error => Err(error.into_error()),
    }
}
