use crate::config::ServerConfig;

/// Settings for the Google REST adapter.
#[derive(Debug, Clone)]
pub struct GoogleRestConfig {
    pub api_key: Option<String>,
    pub url: String,
    /// e.g. `he-IL-Wavenet-A`
    pub voice_name: String,
    /// e.g. `he-IL`
    pub language_code: String,
    /// Accept audio pointers at loopback hosts
    pub allow_localhost_audio_urls: bool,
}

impl GoogleRestConfig {
    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            api_key: config.google_api_key.clone(),
            url: config.google_tts_url.clone(),
            voice_name: config.voice_name.clone(),
            language_code: config.voice_language.clone(),
            allow_localhost_audio_urls: config.allow_localhost_audio_urls,
        }
    }
}

impl Drop for GoogleRestConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}
