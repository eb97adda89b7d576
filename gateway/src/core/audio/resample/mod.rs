//! Tiered conversion of upstream audio to canonical PCM.
//!
//! Tiers are attempted in fidelity order. A tier failing with a recoverable
//! [`AudioError`] hands the buffer to the next one; pass-through at the end
//! cannot fail, so `normalize` only errors on empty input.

pub mod fast;
pub mod native;
pub mod passthrough;

use tracing::{debug, warn};

pub use fast::FastVectorizedStrategy;
pub use native::ContainerNativeStrategy;
pub use passthrough::PassThroughStrategy;

use super::error::{AudioError, AudioResult};
use super::types::{AudioBuffer, ConversionTier, NormalizedAudio, SampleRate};
use crate::core::capabilities::Capabilities;

/// One way of turning an [`AudioBuffer`] into [`NormalizedAudio`].
pub trait ConversionStrategy: Send + Sync {
    fn tier(&self) -> ConversionTier;

    fn convert(&self, buffer: &AudioBuffer, target: SampleRate) -> AudioResult<NormalizedAudio>;
}

/// Ordered set of conversion strategies, fixed at construction.
pub struct ResampleEngine {
    strategies: Vec<Box<dyn ConversionStrategy>>,
}

impl ResampleEngine {
    /// Build the tier chain the probed capabilities allow.
    pub fn new(capabilities: &Capabilities) -> Self {
        let mut strategies: Vec<Box<dyn ConversionStrategy>> = Vec::with_capacity(3);
        if capabilities.fast_vectorized {
            strategies.push(Box::new(FastVectorizedStrategy::new()));
        }
        strategies.push(Box::new(ContainerNativeStrategy::new()));
        strategies.push(Box::new(PassThroughStrategy::new()));
        Self::with_strategies(strategies)
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ConversionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn tiers(&self) -> Vec<ConversionTier> {
        self.strategies.iter().map(|s| s.tier()).collect()
    }

    /// Convert `buffer` to mono PCM16 at `target`.
    pub fn normalize(
        &self,
        buffer: &AudioBuffer,
        target: SampleRate,
    ) -> AudioResult<NormalizedAudio> {
        if buffer.is_empty() {
            return Err(AudioError::EmptyInput);
        }

        let mut last_error = AudioError::ConversionBackendUnavailable(
            "no conversion strategies configured".to_string(),
        );
        for strategy in &self.strategies {
            match strategy.convert(buffer, target) {
                Ok(normalized) => {
                    debug!(
                        tier = %normalized.tier,
                        bytes = normalized.pcm.len(),
                        degraded = normalized.is_degraded(),
                        "Audio normalized"
                    );
                    return Ok(normalized);
                }
                Err(e) if e.is_recoverable() => {
                    warn!(tier = %strategy.tier(), error = %e, "Conversion tier failed, falling back");
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }
        Err(last_error)
    }
}

impl std::fmt::Debug for ResampleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResampleEngine")
            .field("tiers", &self.tiers())
            .finish()
    }
}
