//! Configuration module for the TTS PCM gateway
//!
//! Server configuration comes from environment variables (with `.env` loaded
//! in `main.rs`) and an optional YAML file. Priority: YAML > ENV vars > .env
//! values > defaults.
//!
//! # Example
//! ```rust,no_run
//! use tts_pcm_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = ServerConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

mod env;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::tts::ProviderKind;

pub const DEFAULT_GOOGLE_TTS_URL: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
pub const DEFAULT_DEEPDUB_TTS_URL: &str = "https://restapi.deepdub.ai/api/v1/tts";
pub const DEFAULT_ELEVENLABS_TTS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";

/// Bounds for `UPSTREAM_TIMEOUT_SECONDS`.
pub const MIN_UPSTREAM_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_UPSTREAM_TIMEOUT_SECONDS: u64 = 60;

/// Server configuration
///
/// Contains everything needed to run the gateway:
/// - Server settings (host, port, timeouts, default output rate)
/// - Selected provider and voice
/// - Provider credentials and endpoints (Google REST, Deepdub, ElevenLabs)
/// - VAPI shared secret
/// - Demo mode and conversion backend switches
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Provider selection
    /// Provider name as configured (`google`, `deepdub`, `elevenlabs`, or an alias)
    pub tts_provider: String,
    pub voice_name: String,
    pub voice_language: String,

    // Google Cloud Text-to-Speech (REST, API key auth)
    pub google_api_key: Option<String>,
    pub google_tts_url: String,

    // Deepdub
    pub deepdub_api_key: Option<String>,
    pub deepdub_voice_prompt_id: Option<String>,
    pub deepdub_model: String,
    /// Model retried once when the primary model is denied; `None` disables the retry
    pub deepdub_fallback_model: Option<String>,
    pub deepdub_tts_url: String,

    // ElevenLabs
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_voice_id: Option<String>,
    pub elevenlabs_model_id: String,
    pub elevenlabs_fallback_model_id: Option<String>,
    pub elevenlabs_output_format: String,
    pub elevenlabs_tts_url: String,

    // Authentication
    /// Shared secret expected in `X-VAPI-SECRET`; `None` disables the check
    pub vapi_secret: Option<String>,

    // Runtime behaviour
    /// Serve a synthetic tone instead of calling a provider
    pub demo_mode: bool,
    /// Timeout applied to every upstream request, clamped to 1..=60
    pub upstream_timeout_seconds: u64,
    /// Output rate used when a request does not name one
    pub default_sample_rate: u32,
    /// Operator switch for the decode + resample tier
    pub fast_resample_enabled: bool,
    /// Let provider audio pointers name loopback hosts (local development)
    pub allow_localhost_audio_urls: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            tts_provider: "google".to_string(),
            voice_name: "he-IL-Wavenet-A".to_string(),
            voice_language: "he-IL".to_string(),
            google_api_key: None,
            google_tts_url: DEFAULT_GOOGLE_TTS_URL.to_string(),
            deepdub_api_key: None,
            deepdub_voice_prompt_id: None,
            deepdub_model: "dd-etts-2.5".to_string(),
            deepdub_fallback_model: Some("dd-etts-1.1".to_string()),
            deepdub_tts_url: DEFAULT_DEEPDUB_TTS_URL.to_string(),
            elevenlabs_api_key: None,
            elevenlabs_voice_id: None,
            elevenlabs_model_id: "eleven_v3".to_string(),
            elevenlabs_fallback_model_id: Some("eleven_multilingual_v2".to_string()),
            elevenlabs_output_format: "mp3_44100_128".to_string(),
            elevenlabs_tts_url: DEFAULT_ELEVENLABS_TTS_URL.to_string(),
            vapi_secret: None,
            demo_mode: false,
            upstream_timeout_seconds: 25,
            default_sample_rate: 24000,
            fast_resample_enabled: true,
            allow_localhost_audio_urls: false,
        }
    }
}

/// Zeroize secret fields when the config is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.google_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.deepdub_api_key {
            key.zeroize();
        }
        if let Some(ref mut key) = self.elevenlabs_api_key {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.vapi_secret {
            secret.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, then validate it.
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format or validation fails.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = env::load_from_env()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file on top of the environment.
    ///
    /// Environment variables (and defaults) form the base; every value present
    /// in the YAML file overrides it. The merged result is validated.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = YamlConfig::from_file(path)?;
        let mut config = env::load_from_env()?;
        yaml_config.apply_to(&mut config);
        config.upstream_timeout_seconds = clamp_timeout(config.upstream_timeout_seconds);
        validation::validate(&config)?;
        Ok(config)
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured provider, parsed.
    pub fn provider_kind(&self) -> Result<ProviderKind, String> {
        self.tts_provider.parse()
    }

    /// Get the API key for a provider.
    ///
    /// # Returns
    /// * `Result<String, String>` - The API key on success, or an error message on failure
    pub fn get_api_key(&self, provider: &str) -> Result<String, String> {
        match provider.parse::<ProviderKind>()? {
            ProviderKind::GoogleRest => self.google_api_key.as_ref().cloned().ok_or_else(|| {
                "Google API key not configured in server environment (GOOGLE_API_KEY)".to_string()
            }),
            ProviderKind::Deepdub => self.deepdub_api_key.as_ref().cloned().ok_or_else(|| {
                "Deepdub API key not configured in server environment (DEEPDUB_API_KEY)"
                    .to_string()
            }),
            ProviderKind::ElevenLabs => {
                self.elevenlabs_api_key.as_ref().cloned().ok_or_else(|| {
                    "ElevenLabs API key not configured in server environment (ELEVENLABS_API_KEY)"
                        .to_string()
                })
            }
        }
    }

    /// Whether the selected provider has a key configured.
    pub fn has_provider_credentials(&self) -> bool {
        self.get_api_key(&self.tts_provider).is_ok()
    }

    pub fn upstream_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.upstream_timeout_seconds)
    }
}

pub(crate) fn clamp_timeout(seconds: u64) -> u64 {
    seconds.clamp(MIN_UPSTREAM_TIMEOUT_SECONDS, MAX_UPSTREAM_TIMEOUT_SECONDS)
}
