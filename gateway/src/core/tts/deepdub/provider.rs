use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use super::config::DeepdubConfig;
use crate::core::tts::base::{
    ProviderAdapter, ProviderKind, ProviderReply, SynthesisRequest, TTSError, TTSResult,
};
use crate::core::tts::dispatch::{RawHttpResponse, ResponseDispatcher};

pub struct DeepdubAdapter {
    config: DeepdubConfig,
    client: reqwest::Client,
    dispatcher: ResponseDispatcher,
}

impl DeepdubAdapter {
    pub fn new(config: DeepdubConfig, client: reqwest::Client) -> Self {
        Self {
            dispatcher: ResponseDispatcher::new(client.clone())
                .with_localhost_allowed(config.allow_localhost_audio_urls),
            config,
            client,
        }
    }
}

#[async_trait]
impl ProviderAdapter for DeepdubAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Deepdub
    }

    fn primary_model(&self) -> Option<&str> {
        Some(&self.config.model)
    }

    fn fallback_model(&self) -> Option<&str> {
        self.config.fallback_model.as_deref()
    }

    async fn submit(
        &self,
        request: &SynthesisRequest,
        model: Option<&str>,
    ) -> TTSResult<ProviderReply> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            TTSError::InvalidConfiguration("DEEPDUB_API_KEY is not configured".to_string())
        })?;
        let voice_prompt_id = request
            .voice_ref
            .as_deref()
            .or(self.config.voice_prompt_id.as_deref())
            .ok_or_else(|| {
                TTSError::InvalidConfiguration(
                    "DEEPDUB_VOICE_PROMPT_ID is not configured".to_string(),
                )
            })?;
        let model = model.unwrap_or(&self.config.model);

        let body = DeepdubRequest {
            model,
            target_text: &request.text,
            locale: &self.config.locale,
            voice_prompt_id,
            format: "wav",
            sample_rate: request.sample_rate.hz(),
        };

        info!(
            provider = "deepdub",
            model = %model,
            sample_rate = request.sample_rate.hz(),
            text = %request.text_preview(),
            "Submitting synthesis request"
        );

        let response = self
            .client
            .post(&self.config.url)
            .header("x-api-key", api_key)
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
            "provider": "deepdub",
            "name": "Deepdub TTS",
            "api_type": "HTTP REST",
            "endpoint": self.config.url,
            "locale": self.config.locale,
            "models": {
                "primary": self.config.model,
                "fallback": self.config.fallback_model,
            },
            "reply_formats": ["audio/wav", "application/json (audioUrl)"],
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeepdubRequest<'a> {
    model: &'a str,
    target_text: &'a str,
    locale: &'a str,
    voice_prompt_id: &'a str,
    format: &'static str,
    sample_rate: u32,
}
