//! Tier 3: hand back the upstream bytes untouched.

use tracing::warn;

use super::ConversionStrategy;
use crate::core::audio::error::AudioResult;
use crate::core::audio::types::{
    AudioBuffer, CanonicalPcm, ConversionTier, Degradation, NormalizedAudio, SampleRate,
};

/// Cannot fail. The output carries `Degradation::PassThrough` and may be in
/// any format.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughStrategy;

impl PassThroughStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ConversionStrategy for PassThroughStrategy {
    fn tier(&self) -> ConversionTier {
        ConversionTier::PassThrough
    }

    fn convert(&self, buffer: &AudioBuffer, target: SampleRate) -> AudioResult<NormalizedAudio> {
        warn!(
            bytes = buffer.len(),
            target_rate = target.hz(),
            content_type = buffer.declared_content_type().unwrap_or("none"),
            "Returning upstream audio unmodified"
        );
        Ok(NormalizedAudio {
            pcm: CanonicalPcm::passthrough(buffer.bytes().clone()),
            tier: ConversionTier::PassThrough,
            degradation: Some(Degradation::PassThrough),
            sample_rate_hz: None,
        })
    }
}
