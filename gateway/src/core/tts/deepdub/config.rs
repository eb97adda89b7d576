use crate::config::ServerConfig;

/// Settings for the Deepdub adapter.
#[derive(Debug, Clone)]
pub struct DeepdubConfig {
    pub api_key: Option<String>,
    pub url: String,
    pub voice_prompt_id: Option<String>,
    pub locale: String,
    pub model: String,
    pub fallback_model: Option<String>,
    /// Accept audio pointers at loopback hosts
    pub allow_localhost_audio_urls: bool,
}

impl DeepdubConfig {
    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            api_key: config.deepdub_api_key.clone(),
            url: config.deepdub_tts_url.clone(),
            voice_prompt_id: config.deepdub_voice_prompt_id.clone(),
            locale: config.voice_language.clone(),
            model: config.deepdub_model.clone(),
            fallback_model: config.deepdub_fallback_model.clone(),
            allow_localhost_audio_urls: config.allow_localhost_audio_urls,
        }
    }
}

impl Drop for DeepdubConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}
