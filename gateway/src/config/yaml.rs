use serde::Deserialize;
use std::path::PathBuf;

use super::ServerConfig;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override the environment.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 5000
///   demo_mode: false
///   upstream_timeout_seconds: 25
///   default_sample_rate: 24000
///   fast_resample_enabled: true
///   allow_localhost_audio_urls: false
///
/// tts:
///   provider: "deepdub"
///   voice_name: "he-IL-Wavenet-A"
///   voice_language: "he-IL"
///
/// auth:
///   vapi_secret: "shared-secret"
///
/// providers:
///   google:
///     api_key: "your-google-key"
///   deepdub:
///     api_key: "your-deepdub-key"
///     voice_prompt_id: "prompt-id"
///     model: "dd-etts-2.5"
///     fallback_model: "dd-etts-1.1"
///   elevenlabs:
///     api_key: "your-elevenlabs-key"
///     voice_id: "voice-id"
///     model_id: "eleven_v3"
///     fallback_model_id: "eleven_multilingual_v2"
///     output_format: "mp3_44100_128"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub tts: Option<TtsYaml>,
    pub auth: Option<AuthYaml>,
    pub providers: Option<ProvidersYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub demo_mode: Option<bool>,
    pub upstream_timeout_seconds: Option<u64>,
    pub default_sample_rate: Option<u32>,
    pub fast_resample_enabled: Option<bool>,
    pub allow_localhost_audio_urls: Option<bool>,
}

/// Provider selection and voice from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub provider: Option<String>,
    pub voice_name: Option<String>,
    pub voice_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuthYaml {
    pub vapi_secret: Option<String>,
}

/// Provider credentials and endpoints from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProvidersYaml {
    pub google: Option<GoogleYaml>,
    pub deepdub: Option<DeepdubYaml>,
    pub elevenlabs: Option<ElevenLabsYaml>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GoogleYaml {
    pub api_key: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DeepdubYaml {
    pub api_key: Option<String>,
    pub voice_prompt_id: Option<String>,
    pub model: Option<String>,
    /// Empty string disables the model fallback
    pub fallback_model: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ElevenLabsYaml {
    pub api_key: Option<String>,
    pub voice_id: Option<String>,
    pub model_id: Option<String>,
    /// Empty string disables the model fallback
    pub fallback_model_id: Option<String>,
    pub output_format: Option<String>,
    pub url: Option<String>,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn set_opt<T>(target: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *target = value;
    }
}

/// `""` clears the target, anything else replaces it.
fn set_model(target: &mut Option<String>, value: Option<String>) {
    match value {
        Some(model) if model.trim().is_empty() => *target = None,
        Some(model) => *target = Some(model),
        None => {}
    }
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }

    /// Overlay every value present in the file onto `config`.
    pub fn apply_to(self, config: &mut ServerConfig) {
        if let Some(server) = self.server {
            set(&mut config.host, server.host);
            set(&mut config.port, server.port);
            set(&mut config.demo_mode, server.demo_mode);
            set(
                &mut config.upstream_timeout_seconds,
                server.upstream_timeout_seconds,
            );
            set(&mut config.default_sample_rate, server.default_sample_rate);
            set(
                &mut config.fast_resample_enabled,
                server.fast_resample_enabled,
            );
            set(
                &mut config.allow_localhost_audio_urls,
                server.allow_localhost_audio_urls,
            );
        }

        if let Some(tts) = self.tts {
            set(&mut config.tts_provider, tts.provider);
            set(&mut config.voice_name, tts.voice_name);
            set(&mut config.voice_language, tts.voice_language);
        }

        if let Some(auth) = self.auth {
            set_opt(&mut config.vapi_secret, auth.vapi_secret);
        }

        let Some(providers) = self.providers else {
            return;
        };
        if let Some(google) = providers.google {
            set_opt(&mut config.google_api_key, google.api_key);
            set(&mut config.google_tts_url, google.url);
        }
        if let Some(deepdub) = providers.deepdub {
            set_opt(&mut config.deepdub_api_key, deepdub.api_key);
            set_opt(&mut config.deepdub_voice_prompt_id, deepdub.voice_prompt_id);
            set(&mut config.deepdub_model, deepdub.model);
            set_model(&mut config.deepdub_fallback_model, deepdub.fallback_model);
            set(&mut config.deepdub_tts_url, deepdub.url);
        }
        if let Some(elevenlabs) = providers.elevenlabs {
            set_opt(&mut config.elevenlabs_api_key, elevenlabs.api_key);
            set_opt(&mut config.elevenlabs_voice_id, elevenlabs.voice_id);
            set(&mut config.elevenlabs_model_id, elevenlabs.model_id);
            set_model(
                &mut config.elevenlabs_fallback_model_id,
                elevenlabs.fallback_model_id,
            );
            set(&mut config.elevenlabs_output_format, elevenlabs.output_format);
            set(&mut config.elevenlabs_tts_url, elevenlabs.url);
        }
    }
}
