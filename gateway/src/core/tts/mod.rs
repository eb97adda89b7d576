mod base;
pub mod deepdub;
pub mod dispatch;
pub mod elevenlabs;
pub mod google;

pub use base::{
    ERROR_BODY_PREVIEW_CHARS, LOG_TEXT_PREVIEW_CHARS, ProviderAdapter, ProviderKind,
    ProviderReply, ReplyErrorCause, SynthesisRequest, TTSError, TTSResult, is_model_denial,
    preview,
};
pub use deepdub::{DEEPDUB_TTS_URL, DeepdubAdapter, DeepdubConfig};
pub use dispatch::{RawHttpResponse, ResponseDispatcher, reply_into_audio};
pub use elevenlabs::{ELEVENLABS_TTS_URL, ElevenLabsAdapter, ElevenLabsConfig};
pub use google::{GOOGLE_TTS_URL, GoogleRestAdapter, GoogleRestConfig};

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ServerConfig;

/// Factory function to create a provider adapter.
///
/// # Supported Providers
///
/// - `"google"` or `"google-rest"` - Google Cloud Text-to-Speech REST API
/// - `"deepdub"` - Deepdub TTS API
/// - `"elevenlabs"` or `"eleven-labs"` - ElevenLabs TTS API
///
/// The adapter shares `client` (and its connection pool and timeout) with
/// every other upstream call in the process.
pub fn create_provider_adapter(
    provider_type: &str,
    config: &ServerConfig,
    client: reqwest::Client,
) -> TTSResult<Arc<dyn ProviderAdapter>> {
    let kind: ProviderKind = provider_type
        .parse()
        .map_err(TTSError::InvalidConfiguration)?;

    Ok(match kind {
        ProviderKind::GoogleRest => Arc::new(GoogleRestAdapter::new(
            GoogleRestConfig::from_server_config(config),
            client,
        )),
        ProviderKind::Deepdub => Arc::new(DeepdubAdapter::new(
            DeepdubConfig::from_server_config(config),
            client,
        )),
        ProviderKind::ElevenLabs => Arc::new(ElevenLabsAdapter::new(
            ElevenLabsConfig::from_server_config(config),
            client,
        )),
    })
}

/// Default endpoint of every supported provider.
pub fn get_tts_provider_urls() -> HashMap<String, String> {
    let mut urls = HashMap::new();
    urls.insert("google".to_string(), GOOGLE_TTS_URL.to_string());
    urls.insert("deepdub".to_string(), DEEPDUB_TTS_URL.to_string());
    urls.insert("elevenlabs".to_string(), ELEVENLABS_TTS_URL.to_string());
    urls
}
