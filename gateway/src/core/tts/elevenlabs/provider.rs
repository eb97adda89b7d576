use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::config::ElevenLabsConfig;
use crate::core::tts::base::{
    ProviderAdapter, ProviderKind, ProviderReply, SynthesisRequest, TTSError, TTSResult,
};
use crate::core::tts::dispatch::{RawHttpResponse, ResponseDispatcher};

pub struct ElevenLabsAdapter {
    config: ElevenLabsConfig,
    client: reqwest::Client,
    dispatcher: ResponseDispatcher,
}

impl ElevenLabsAdapter {
    pub fn new(config: ElevenLabsConfig, client: reqwest::Client) -> Self {
        Self {
            dispatcher: ResponseDispatcher::new(client.clone())
                .with_localhost_allowed(config.allow_localhost_audio_urls),
            config,
            client,
        }
    }
}

#[async_trait]
impl ProviderAdapter for ElevenLabsAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ElevenLabs
    }

    fn primary_model(&self) -> Option<&str> {
        Some(&self.config.model_id)
    }

    fn fallback_model(&self) -> Option<&str> {
        self.config.fallback_model_id.as_deref()
    }

    async fn submit(
        &self,
        request: &SynthesisRequest,
        model: Option<&str>,
    ) -> TTSResult<ProviderReply> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            TTSError::InvalidConfiguration("ELEVENLABS_API_KEY is not configured".to_string())
        })?;
        let voice_id = request
            .voice_ref
            .as_deref()
            .or(self.config.voice_id.as_deref())
            .ok_or_else(|| {
                TTSError::InvalidConfiguration("ELEVENLABS_VOICE_ID is not configured".to_string())
            })?;
        let model_id = model.unwrap_or(&self.config.model_id);

        let body = ElevenLabsRequest {
            text: &request.text,
            model_id,
        };

        info!(
            provider = "elevenlabs",
            model = %model_id,
            voice = %voice_id,
            text = %request.text_preview(),
            "Submitting synthesis request"
        );

        let response = self
            .client
            .post(self.config.endpoint(voice_id))
            .query(&[("output_format", self.config.output_format.as_str())])
            .header("xi-api-key", api_key)
            .header("Accept", "audio/*")
            .json(&body)
            .send()
            .await
            .map_err(TTSError::from_request_error)?;

        self.dispatcher
            .dispatch(RawHttpResponse::from_reqwest(response).await?)
            .await
    }

    fn provider_info(&self) -> serde_json::Value {
        serde_json::json!({
            "provider": "elevenlabs",
            "name": "ElevenLabs TTS",
            "api_type": "HTTP REST",
            "endpoint": self.config.url,
            "output_format": self.config.output_format,
            "models": {
                "primary": self.config.model_id,
                "fallback": self.config.fallback_model_id,
            },
        })
    }
}

#[derive(Debug, Serialize)]
struct ElevenLabsRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;

    #[test]
    fn test_endpoint_joins_voice_id() {
        let mut config = ElevenLabsConfig::from_server_config(&ServerConfig::default());
        config.url = "https://api.elevenlabs.io/v1/text-to-speech/".to_string();
        assert_eq!(
            config.endpoint("abc"),
            "https://api.elevenlabs.io/v1/text-to-speech/abc"
        );
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_value(ElevenLabsRequest {
            text: "hi",
            model_id: "eleven_v3",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"text": "hi", "model_id": "eleven_v3"}));
    }

    #[test]
    fn test_model_axis() {
        let mut server_config = ServerConfig::default();
        server_config.elevenlabs_fallback_model_id = None;
        let adapter = ElevenLabsAdapter::new(
            ElevenLabsConfig::from_server_config(&server_config),
            reqwest::Client::new(),
        );
        assert_eq!(adapter.kind(), ProviderKind::ElevenLabs);
        assert_eq!(adapter.primary_model(), Some("eleven_v3"));
        assert_eq!(adapter.fallback_model(), None);
    }
}
