use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::core::audio::ResampleEngine;
use crate::core::capabilities::Capabilities;
use crate::core::orchestrator::FallbackOrchestrator;
use crate::core::tts::{TTSError, TTSResult, create_provider_adapter};
use crate::utils::validate_audio_url;

const MAX_REDIRECTS: usize = 5;

/// Shared, read-only application state.
///
/// Built once at startup; request handlers only ever borrow from it.
pub struct AppState {
    pub config: ServerConfig,
    pub capabilities: Capabilities,
    pub engine: Arc<ResampleEngine>,
    pub orchestrator: Arc<FallbackOrchestrator>,
}

impl AppState {
    /// Probe capabilities, build the upstream HTTP client and wire the pipeline.
    ///
    /// # Errors
    /// Fails when the configured provider is unknown or the HTTP client
    /// cannot be constructed.
    pub fn new(config: ServerConfig) -> TTSResult<Arc<Self>> {
        let capabilities = Capabilities::probe(&config);
        let engine = Arc::new(ResampleEngine::new(&capabilities));

        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout())
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .redirect(redirect_policy(config.allow_localhost_audio_urls))
            .build()
            .map_err(|e| TTSError::InvalidConfiguration(format!("HTTP client: {e}")))?;

        let adapter = create_provider_adapter(&config.tts_provider, &config, client)?;
        let orchestrator = Arc::new(FallbackOrchestrator::new(adapter, engine.clone()));

        info!(
            provider = %orchestrator.provider(),
            tiers = ?engine.tiers(),
            demo_mode = capabilities.demo_mode,
            timeout_secs = config.upstream_timeout_seconds,
            "Application state initialised"
        );

        Ok(Arc::new(Self {
            config,
            capabilities,
            engine,
            orchestrator,
        }))
    }
}

/// Redirect targets get the same address checks as audio pointers.
fn redirect_policy(allow_localhost: bool) -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        match validate_audio_url(attempt.url().as_str(), allow_localhost) {
            Ok(_) => attempt.follow(),
            Err(e) => {
                warn!(url = %attempt.url(), error = %e, "Refusing upstream redirect");
                attempt.stop()
            }
        }
    })
}
