use std::env;
use std::str::FromStr;

use super::{ServerConfig, clamp_timeout};

/// Read a variable, treating unset and blank the same.
fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| format!("Invalid {key} value '{raw}': {e}"))
        })
        .transpose()
}

fn env_bool(key: &str) -> Option<bool> {
    env_string(key).map(|value| matches!(value.to_lowercase().as_str(), "true" | "1" | "yes"))
}

/// Optional model name where an explicitly empty value means "none".
fn env_optional_model(key: &str, default: Option<String>) -> Option<String> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => None,
        Ok(value) => Some(value.trim().to_string()),
        Err(_) => default,
    }
}

/// Build a config from the process environment on top of the defaults.
pub(super) fn load_from_env() -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = ServerConfig::default();

    if let Some(host) = env_string("HOST") {
        config.host = host;
    }
    if let Some(port) = env_parse::<u16>("PORT")? {
        config.port = port;
    }

    if let Some(provider) = env_string("TTS_PROVIDER") {
        config.tts_provider = provider;
    }
    if let Some(voice) = env_string("VOICE_NAME") {
        config.voice_name = voice;
    }
    if let Some(language) = env_string("VOICE_LANGUAGE") {
        config.voice_language = language;
    }

    config.google_api_key = env_string("GOOGLE_API_KEY");
    if let Some(url) = env_string("GOOGLE_TTS_URL") {
        config.google_tts_url = url;
    }

    config.deepdub_api_key = env_string("DEEPDUB_API_KEY");
    config.deepdub_voice_prompt_id = env_string("DEEPDUB_VOICE_PROMPT_ID");
    if let Some(model) = env_string("DEEPDUB_MODEL") {
        config.deepdub_model = model;
    }
    config.deepdub_fallback_model =
        env_optional_model("DEEPDUB_FALLBACK_MODEL", config.deepdub_fallback_model.take());
    if let Some(url) = env_string("DEEPDUB_TTS_URL") {
        config.deepdub_tts_url = url;
    }

    config.elevenlabs_api_key = env_string("ELEVENLABS_API_KEY");
    config.elevenlabs_voice_id = env_string("ELEVENLABS_VOICE_ID");
    if let Some(model) = env_string("ELEVENLABS_MODEL_ID") {
        config.elevenlabs_model_id = model;
    }
    config.elevenlabs_fallback_model_id = env_optional_model(
        "ELEVENLABS_FALLBACK_MODEL_ID",
        config.elevenlabs_fallback_model_id.take(),
    );
    if let Some(format) = env_string("ELEVENLABS_OUTPUT_FORMAT") {
        config.elevenlabs_output_format = format;
    }
    if let Some(url) = env_string("ELEVENLABS_TTS_URL") {
        config.elevenlabs_tts_url = url;
    }

    config.vapi_secret = env_string("VAPI_SECRET");

    if let Some(demo) = env_bool("DEMO_MODE") {
        config.demo_mode = demo;
    }
    if let Some(timeout) = env_parse::<u64>("UPSTREAM_TIMEOUT_SECONDS")? {
        config.upstream_timeout_seconds = clamp_timeout(timeout);
    }
    if let Some(rate) = env_parse::<u32>("DEFAULT_SAMPLE_RATE")? {
        config.default_sample_rate = rate;
    }
    if let Some(enabled) = env_bool("FAST_RESAMPLE_ENABLED") {
        config.fast_resample_enabled = enabled;
    }
    if let Some(allow) = env_bool("ALLOW_LOCALHOST_AUDIO_URLS") {
        config.allow_localhost_audio_urls = allow;
    }

    Ok(config)
}
