//! Provider call + normalization, with the two fallback axes kept apart.
//!
//! Model axis: the primary model is tried first; if the provider denies
//! access to it, the fallback model is tried exactly once and its outcome is
//! final. Any other failure ends the request immediately.
//!
//! Tier axis: whatever audio comes back goes through the
//! [`ResampleEngine`] tier chain.

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::audio::{NormalizedAudio, ResampleEngine};
use crate::core::tts::{
    ProviderAdapter, ProviderKind, ProviderReply, SynthesisRequest, TTSError, TTSResult,
    reply_into_audio,
};

/// A finished synthesis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOutcome {
    pub audio: NormalizedAudio,
    pub provider: ProviderKind,
    /// Model that produced the audio, if the provider has models
    pub model: Option<String>,
    pub model_fallback_used: bool,
}

/// Runs one request through provider submission and normalization.
pub struct FallbackOrchestrator {
    adapter: Arc<dyn ProviderAdapter>,
    engine: Arc<ResampleEngine>,
}

impl FallbackOrchestrator {
    pub fn new(adapter: Arc<dyn ProviderAdapter>, engine: Arc<ResampleEngine>) -> Self {
        Self { adapter, engine }
    }

    pub fn provider(&self) -> ProviderKind {
        self.adapter.kind()
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    pub async fn synthesize(&self, request: &SynthesisRequest) -> TTSResult<SynthesisOutcome> {
        let (reply, model, model_fallback_used) = self.submit_with_model_fallback(request).await?;
        let buffer = reply_into_audio(reply)?;

        let engine = self.engine.clone();
        let target = request.sample_rate;
        let audio = tokio::task::spawn_blocking(move || engine.normalize(&buffer, target))
            .await
            .map_err(|e| TTSError::InternalError(format!("normalization task failed: {e}")))??;

        info!(
            provider = %self.adapter.kind(),
            model = model.as_deref().unwrap_or("-"),
            tier = %audio.tier,
            degraded = audio.is_degraded(),
            bytes = audio.pcm.len(),
            "Synthesis complete"
        );

        Ok(SynthesisOutcome {
            audio,
            provider: self.adapter.kind(),
            model,
            model_fallback_used,
        })
    }

    /// Primary attempt, plus at most one retry on a model denial.
    async fn submit_with_model_fallback(
        &self,
        request: &SynthesisRequest,
    ) -> TTSResult<(ProviderReply, Option<String>, bool)> {
        let primary = self.adapter.primary_model().map(str::to_string);
        let reply = self.adapter.submit(request, primary.as_deref()).await?;

        if !self.adapter.is_model_access_denied(&reply) {
            return Ok((reply, primary, false));
        }

        let denied = primary.clone().unwrap_or_default();
        let Some(fallback) = self.adapter.fallback_model().map(str::to_string) else {
            return Err(denial_error(denied, reply));
        };

        warn!(
            provider = %self.adapter.kind(),
            denied_model = %denied,
            fallback_model = %fallback,
            "Model access denied, retrying once with fallback model"
        );

        let reply = self.adapter.submit(request, Some(&fallback)).await?;
        if self.adapter.is_model_access_denied(&reply) {
            return Err(denial_error(fallback, reply));
        }
        Ok((reply, Some(fallback), true))
    }
}

fn denial_error(model: String, reply: ProviderReply) -> TTSError {
    let body = match reply {
        ProviderReply::Error { body, .. } => body,
        _ => String::new(),
    };
    TTSError::ModelAccessDenied { model, body }
}
