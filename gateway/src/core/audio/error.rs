//! Audio normalization error types.

use thiserror::Error;

/// Errors raised while sniffing, parsing or converting upstream audio.
///
/// `ConversionBackendUnavailable` and `DecodeFailed` are recovered inside the
/// [`ResampleEngine`](super::ResampleEngine) by falling to the next tier; they
/// only reach a caller that invokes a single strategy directly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The buffer is not a format the current stage can parse
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// RIFF/WAVE chunk structure is invalid or truncated
    #[error("Malformed WAV container: {0}")]
    MalformedContainer(String),

    /// Tier 1 decode/resample backend is not compiled in or disabled
    #[error("Conversion backend unavailable: {0}")]
    ConversionBackendUnavailable(String),

    /// The backend was present but could not decode the payload
    #[error("Audio decode failed: {0}")]
    DecodeFailed(String),

    /// Requested output rate is outside the accepted set
    #[error("Unsupported sample rate: {0} Hz (supported: 8000, 16000, 22050, 24000, 44100)")]
    SampleRateUnsupported(u32),

    /// Zero-length audio buffer
    #[error("Audio buffer is empty")]
    EmptyInput,
}

/// Result type for audio operations.
pub type AudioResult<T> = Result<T, AudioError>;

impl AudioError {
    /// Errors that let the engine move on to the next conversion tier.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::MalformedContainer(_)
                | Self::ConversionBackendUnavailable(_)
                | Self::DecodeFailed(_)
        )
    }
}
