use super::ServerConfig;
use crate::core::audio::SampleRate;
use crate::core::tts::ProviderKind;

/// Validate a fully merged configuration.
///
/// Provider-specific identifiers are only required when the provider will
/// actually be called, so demo mode skips them.
pub(super) fn validate(config: &ServerConfig) -> Result<(), String> {
    let provider = config.provider_kind()?;

    SampleRate::try_from(config.default_sample_rate)
        .map_err(|e| format!("Invalid DEFAULT_SAMPLE_RATE: {e}"))?;

    if config.demo_mode {
        return Ok(());
    }

    match provider {
        ProviderKind::Deepdub if config.deepdub_voice_prompt_id.is_none() => Err(
            "DEEPDUB_VOICE_PROMPT_ID is required when TTS_PROVIDER is deepdub".to_string(),
        ),
        ProviderKind::ElevenLabs if config.elevenlabs_voice_id.is_none() => Err(
            "ELEVENLABS_VOICE_ID is required when TTS_PROVIDER is elevenlabs".to_string(),
        ),
        _ => Ok(()),
    }
}
