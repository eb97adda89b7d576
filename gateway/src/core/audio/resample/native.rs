//! Tier 2: WAV extraction plus left-channel downmix.
//!
//! Never resamples. A source rate that differs from the target is reported
//! as `Degradation::RateMismatch` and the audio is returned at source rate.

use tracing::warn;

use super::ConversionStrategy;
use crate::core::audio::downmix::{Downmixed, left_channel};
use crate::core::audio::error::{AudioError, AudioResult};
use crate::core::audio::format::{AudioFormat, sniff};
use crate::core::audio::types::{
    AudioBuffer, CanonicalPcm, ConversionTier, Degradation, NormalizedAudio, SampleRate,
};
use crate::core::audio::wav::read_wav;

#[derive(Debug, Default, Clone, Copy)]
pub struct ContainerNativeStrategy;

impl ContainerNativeStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ConversionStrategy for ContainerNativeStrategy {
    fn tier(&self) -> ConversionTier {
        ConversionTier::ContainerNative
    }

    fn convert(&self, buffer: &AudioBuffer, target: SampleRate) -> AudioResult<NormalizedAudio> {
        match sniff(buffer)? {
            AudioFormat::Wav => {}
            other => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "container-native conversion handles WAV only, got {other}"
                )));
            }
        }

        let decoded = read_wav(buffer.bytes())?;
        let source_hz = decoded.sample_rate_hz;

        let (pcm, degradation) = match left_channel(&decoded) {
            Downmixed::Mono(bytes) => {
                let degradation = (source_hz != target.hz()).then_some(Degradation::RateMismatch {
                    source_hz,
                    target_hz: target.hz(),
                });
                (CanonicalPcm::from_le_bytes(bytes), degradation)
            }
            Downmixed::Unsupported {
                channels,
                bit_depth,
            } => (
                CanonicalPcm::from_le_bytes(decoded.data.clone()),
                Some(Degradation::LayoutUnsupported {
                    channels,
                    bit_depth,
                }),
            ),
        };

        if let Some(degradation) = &degradation {
            warn!(
                degradation = %degradation,
                channels = decoded.channel_count,
                bits = decoded.bit_depth_bits,
                "Container-native conversion returned non-conformant audio"
            );
        }

        Ok(NormalizedAudio {
            pcm,
            tier: ConversionTier::ContainerNative,
            degradation,
            sample_rate_hz: Some(source_hz),
        })
    }
}
