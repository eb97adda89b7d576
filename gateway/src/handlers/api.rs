use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;
use serde_json::{Value, json};

use crate::core::audio::{ConversionTier, SampleRate};
use crate::core::tts::get_tts_provider_urls;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub demo_mode: bool,
    pub tts_provider: String,
    pub voice_name: String,
    pub voice_language: String,
    pub conversion_tiers: Vec<ConversionTier>,
    pub credentials_configured: bool,
}

/// `GET /health`
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        demo_mode: state.capabilities.demo_mode,
        tts_provider: state.orchestrator.provider().to_string(),
        voice_name: state.config.voice_name.clone(),
        voice_language: state.config.voice_language.clone(),
        conversion_tiers: state.engine.tiers(),
        credentials_configured: state.config.has_provider_credentials(),
    })
}

/// `GET /`
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "provider": state.orchestrator.adapter().provider_info(),
        "supported_providers": get_tts_provider_urls(),
        "output": {
            "encoding": "pcm_s16le",
            "channels": 1,
            "sample_rates": SampleRate::SUPPORTED,
            "default_sample_rate": state.config.default_sample_rate,
        },
        "endpoints": {
            "tts": "POST /tts",
            "health": "GET /health",
        },
    }))
}
