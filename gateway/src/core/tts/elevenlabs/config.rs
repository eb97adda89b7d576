use crate::config::ServerConfig;

/// Settings for the ElevenLabs adapter.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: Option<String>,
    /// Base URL; the voice id is appended as a path segment
    pub url: String,
    pub voice_id: Option<String>,
    pub model_id: String,
    pub fallback_model_id: Option<String>,
    /// e.g. `mp3_44100_128`, `pcm_24000`
    pub output_format: String,
    /// Accept audio pointers at loopback hosts
    pub allow_localhost_audio_urls: bool,
}

impl ElevenLabsConfig {
    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            api_key: config.elevenlabs_api_key.clone(),
            url: config.elevenlabs_tts_url.clone(),
            voice_id: config.elevenlabs_voice_id.clone(),
            model_id: config.elevenlabs_model_id.clone(),
            fallback_model_id: config.elevenlabs_fallback_model_id.clone(),
            output_format: config.elevenlabs_output_format.clone(),
            allow_localhost_audio_urls: config.allow_localhost_audio_urls,
        }
    }

    pub fn endpoint(&self, voice_id: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), voice_id)
    }
}

impl Drop for ElevenLabsConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.api_key {
            key.zeroize();
        }
    }
}
