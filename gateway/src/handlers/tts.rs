use std::sync::Arc;

use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::core::audio::{NormalizedAudio, SampleRate};
use crate::core::demo::demo_tone;
use crate::core::orchestrator::SynthesisOutcome;
use crate::core::tts::SynthesisRequest;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

pub const PCM_CONTENT_TYPE: &str = "audio/pcm";

pub static X_CONVERSION_TIER: HeaderName = HeaderName::from_static("x-conversion-tier");
pub static X_AUDIO_DEGRADED: HeaderName = HeaderName::from_static("x-audio-degraded");
pub static X_DEGRADATION: HeaderName = HeaderName::from_static("x-degradation");
pub static X_SAMPLE_RATE: HeaderName = HeaderName::from_static("x-sample-rate");
pub static X_MODEL_FALLBACK: HeaderName = HeaderName::from_static("x-model-fallback");
pub static X_DEMO_MODE: HeaderName = HeaderName::from_static("x-demo-mode");

/// Voice platform request: `{"message": {"type": "voice-request", "text", "sampleRate"}}`.
#[derive(Debug, Deserialize)]
pub struct VoiceRequestMessage {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "sampleRate")]
    pub sample_rate: Option<u32>,
    pub voice: Option<String>,
}

/// Either the voice platform envelope or a bare `{"text": "..."}` body.
#[derive(Debug, Deserialize)]
pub struct TtsRequestBody {
    pub message: Option<VoiceRequestMessage>,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "sampleRate")]
    pub sample_rate: Option<u32>,
    pub voice: Option<String>,
}

impl TtsRequestBody {
    /// Validate into a pipeline request, applying `default_rate` when no rate is given.
    pub fn into_request(self, default_rate: u32) -> AppResult<SynthesisRequest> {
        let (text, rate, voice) = match self.message {
            Some(message) => (message.text, message.sample_rate, message.voice),
            None => (self.text, self.sample_rate, self.voice),
        };

        let sample_rate = SampleRate::try_from(rate.unwrap_or(default_rate))?;
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("No text provided".to_string()));
        }

        let request = SynthesisRequest::new(text, sample_rate)?;
        Ok(match voice {
            Some(voice) if !voice.trim().is_empty() => request.with_voice(voice),
            _ => request,
        })
    }
}

/// `POST /tts`
///
/// Answers with raw 16-bit mono PCM. Conversion metadata travels in
/// `X-*` response headers so the body stays playable as is.
pub async fn tts_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TtsRequestBody>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = body.into_request(state.config.default_sample_rate)?;

    info!(
        text = %request.text_preview(),
        sample_rate = %request.sample_rate,
        demo_mode = state.capabilities.demo_mode,
        "TTS request"
    );

    if state.capabilities.demo_mode {
        let pcm = demo_tone(request.sample_rate);
        let mut headers = HeaderMap::new();
        headers.insert(X_DEMO_MODE.clone(), HeaderValue::from_static("true"));
        headers.insert(X_AUDIO_DEGRADED.clone(), HeaderValue::from_static("false"));
        headers.insert(X_SAMPLE_RATE.clone(), HeaderValue::from(request.sample_rate.hz()));
        return Ok(pcm_response(headers, pcm.into_bytes()));
    }

    let outcome = state.orchestrator.synthesize(&request).await?;
    let headers = outcome_headers(&outcome);
    Ok(pcm_response(headers, outcome.audio.pcm.into_bytes()))
}

fn pcm_response(mut headers: HeaderMap, body: Bytes) -> Response {
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(PCM_CONTENT_TYPE));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    (StatusCode::OK, headers, body).into_response()
}

/// Response headers describing how the audio was produced.
pub fn outcome_headers(outcome: &SynthesisOutcome) -> HeaderMap {
    let mut headers = audio_headers(&outcome.audio);
    headers.insert(
        X_MODEL_FALLBACK.clone(),
        HeaderValue::from_static(if outcome.model_fallback_used {
            "true"
        } else {
            "false"
        }),
    );
    headers
}

fn audio_headers(audio: &NormalizedAudio) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        X_CONVERSION_TIER.clone(),
        HeaderValue::from_static(audio.tier.as_str()),
    );
    headers.insert(
        X_AUDIO_DEGRADED.clone(),
        HeaderValue::from_static(if audio.is_degraded() { "true" } else { "false" }),
    );
    if let Some(degradation) = audio.degradation {
        headers.insert(
            X_DEGRADATION.clone(),
            HeaderValue::from_static(degradation.as_str()),
        );
    }
    headers.insert(
        X_SAMPLE_RATE.clone(),
        match audio.sample_rate_hz {
            Some(hz) => HeaderValue::from(hz),
            None => HeaderValue::from_static("unknown"),
        },
    );
    headers
}
