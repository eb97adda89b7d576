use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::GoogleRestConfig;
use crate::core::tts::base::{
    ProviderAdapter, ProviderKind, ProviderReply, ReplyErrorCause, SynthesisRequest, TTSError,
    TTSResult,
};
use crate::core::tts::dispatch::{RawHttpResponse, ResponseDispatcher};

pub struct GoogleRestAdapter {
    config: GoogleRestConfig,
    client: reqwest::Client,
    dispatcher: ResponseDispatcher,
}

impl GoogleRestAdapter {
    pub fn new(config: GoogleRestConfig, client: reqwest::Client) -> Self {
        Self {
            dispatcher: ResponseDispatcher::new(client.clone())
                .with_localhost_allowed(config.allow_localhost_audio_urls),
            config,
            client,
        }
    }

    /// Unwrap the base64 `audioContent` of a 200 reply.
    fn decode_success(raw: &RawHttpResponse) -> ProviderReply {
        let malformed = |detail: String| ProviderReply::Error {
            status: raw.status,
            body: String::new(),
            cause: ReplyErrorCause::MalformedJson(detail),
        };

        let parsed: GoogleSynthesizeResponse = match serde_json::from_slice(&raw.body) {
            Ok(parsed) => parsed,
            Err(e) => return malformed(format!("Failed to parse response: {e}")),
        };
        let Some(content) = parsed.audio_content.filter(|c| !c.is_empty()) else {
            return malformed("response has no audioContent".to_string());
        };
        match BASE64.decode(content.as_bytes()) {
            Ok(bytes) => ProviderReply::InlineAudio {
                bytes: bytes.into(),
                content_type: "audio/wav".to_string(),
            },
            Err(e) => malformed(format!("Base64 decode error: {e}")),
        }
    }
}

#[async_trait]
impl ProviderAdapter for GoogleRestAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GoogleRest
    }

    fn primary_model(&self) -> Option<&str> {
        None
    }

    fn fallback_model(&self) -> Option<&str> {
        None
    }

    async fn submit(
        &self,
        request: &SynthesisRequest,
        _model: Option<&str>,
    ) -> TTSResult<ProviderReply> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            TTSError::InvalidConfiguration("GOOGLE_API_KEY is not configured".to_string())
        })?;

        let body = GoogleSynthesizeRequest {
            input: GoogleInput {
                text: &request.text,
            },
            voice: GoogleVoice {
                language_code: &self.config.language_code,
                name: request
                    .voice_ref
                    .as_deref()
                    .unwrap_or(&self.config.voice_name),
            },
            audio_config: GoogleAudioConfig {
                audio_encoding: "LINEAR16",
                sample_rate_hertz: request.sample_rate.hz(),
            },
        };

        info!(
            provider = "google",
            voice = %body.voice.name,
            sample_rate = request.sample_rate.hz(),
            text = %request.text_preview(),
            "Submitting synthesis request"
        );

        let response = self
            .client
            .post(&self.config.url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(TTSError::from_request_error)?;
        let raw = RawHttpResponse::from_reqwest(response).await?;

        if raw.status != 200 {
            return self.dispatcher.dispatch(raw).await;
        }
        let reply = Self::decode_success(&raw);
        debug!(error = reply.is_error(), "Google reply decoded");
        Ok(reply)
    }

    fn provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "google",
            "name": "Google Cloud Text-to-Speech",
            "api_type": "HTTP REST",
            "endpoint": self.config.url,
            "voice_name": self.config.voice_name,
            "language_code": self.config.language_code,
            "audio_encoding": "LINEAR16",
            "models": [],
        })
    }
}

#[derive(Debug, Serialize)]
struct GoogleSynthesizeRequest<'a> {
    input: GoogleInput<'a>,
    voice: GoogleVoice<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: GoogleAudioConfig,
}

#[derive(Debug, Serialize)]
struct GoogleInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GoogleVoice<'a> {
    #[serde(rename = "languageCode")]
    language_code: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct GoogleAudioConfig {
    #[serde(rename = "audioEncoding")]
    audio_encoding: &'static str,
    #[serde(rename = "sampleRateHertz")]
    sample_rate_hertz: u32,
}

#[derive(Debug, Deserialize)]
struct GoogleSynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use http::HeaderMap;

    #[test]
    fn test_request_serialization() {
        let request = GoogleSynthesizeRequest {
            input: GoogleInput { text: "שלום" },
            voice: GoogleVoice {
                language_code: "he-IL",
                name: "he-IL-Wavenet-A",
            },
            audio_config: GoogleAudioConfig {
                audio_encoding: "LINEAR16",
                sample_rate_hertz: 24000,
            },
        };

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"]["text"], "שלום");
        assert_eq!(json["voice"]["languageCode"], "he-IL");
        assert_eq!(json["audioConfig"]["audioEncoding"], "LINEAR16");
        assert_eq!(json["audioConfig"]["sampleRateHertz"], 24000);
    }

    #[test]
    fn test_decode_success() {
        let body = serde_json::json!({ "audioContent": BASE64.encode(b"RIFFdata") });
        let raw = RawHttpResponse::new(200, HeaderMap::new(), body.to_string());
        assert_eq!(
            GoogleRestAdapter::decode_success(&raw),
            ProviderReply::InlineAudio {
                bytes: bytes::Bytes::from_static(b"RIFFdata"),
                content_type: "audio/wav".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_missing_audio_content() {
        let raw = RawHttpResponse::new(200, HeaderMap::new(), "{}");
        assert!(matches!(
            GoogleRestAdapter::decode_success(&raw).into_error(),
            TTSError::MalformedJsonReply(_)
        ));
    }

    #[test]
    fn test_provider_info_and_models() {
        let adapter = GoogleRestAdapter::new(
            GoogleRestConfig::from_server_config(&ServerConfig::default()),
            reqwest::Client::new(),
        );
        assert_eq!(adapter.kind(), ProviderKind::GoogleRest);
        assert!(adapter.primary_model().is_none());
        assert!(adapter.fallback_model().is_none());
        assert_eq!(adapter.provider_info()["provider"], "google");
    }

    #[tokio::test]
    async fn test_submit_requires_api_key() {
        let adapter = GoogleRestAdapter::new(
            GoogleRestConfig::from_server_config(&ServerConfig::default()),
            reqwest::Client::new(),
        );
        let request =
            SynthesisRequest::new("hello", crate::core::audio::SampleRate::HZ_24000).unwrap();
        assert!(matches!(
            adapter.submit(&request, None).await,
            Err(TTSError::InvalidConfiguration(_))
        ));
    }
}
