//! Data types flowing through the normalization pipeline.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

use super::error::{AudioError, AudioResult};

// =============================================================================
// Input
// =============================================================================

/// Raw audio bytes as received from a provider, plus the content type the
/// provider declared for them (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    bytes: Bytes,
    declared_content_type: Option<String>,
}

impl AudioBuffer {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            declared_content_type: None,
        }
    }

    /// Attach the upstream `Content-Type`, lowercased and stripped of parameters.
    pub fn with_content_type(mut self, content_type: impl AsRef<str>) -> Self {
        self.declared_content_type = Some(normalize_content_type(content_type.as_ref()));
        self
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn declared_content_type(&self) -> Option<&str> {
        self.declared_content_type.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `"Audio/WAV; charset=binary"` -> `"audio/wav"`
pub fn normalize_content_type(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

// =============================================================================
// Intermediate
// =============================================================================

/// Sample frames extracted from a container, still in their source layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    /// Interleaved little-endian sample bytes, exactly as stored in `data`
    pub data: Bytes,
    pub channel_count: u16,
    pub sample_rate_hz: u32,
    pub bit_depth_bits: u16,
}

impl DecodedAudio {
    /// Bytes occupied by one frame (one sample for every channel).
    pub fn block_align(&self) -> usize {
        self.channel_count as usize * (self.bit_depth_bits as usize).div_ceil(8)
    }

    pub fn frame_count(&self) -> usize {
        match self.block_align() {
            0 => 0,
            align => self.data.len() / align,
        }
    }

    pub fn is_mono_pcm16(&self) -> bool {
        self.channel_count == 1 && self.bit_depth_bits == 16
    }
}

// =============================================================================
// Output
// =============================================================================

/// 16-bit signed little-endian mono PCM, the only shape the downstream voice
/// consumer accepts.
///
/// Everything built through [`CanonicalPcm::from_le_bytes`] or
/// [`CanonicalPcm::from_samples`] has an even length. [`CanonicalPcm::passthrough`]
/// wraps bytes verbatim and makes no such promise.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalPcm {
    bytes: Bytes,
}

impl CanonicalPcm {
    /// Wrap PCM16 bytes, dropping a dangling half sample if present.
    pub fn from_le_bytes(bytes: impl Into<Bytes>) -> Self {
        let mut bytes: Bytes = bytes.into();
        if bytes.len() % 2 != 0 {
            bytes.truncate(bytes.len() - 1);
        }
        Self { bytes }
    }

    pub fn from_samples(samples: &[i16]) -> Self {
        let mut out = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            out.extend_from_slice(&sample.to_le_bytes());
        }
        Self { bytes: out.into() }
    }

    /// Unmodified upstream bytes; the caller must not assume PCM16 mono.
    pub fn passthrough(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.bytes.len() / 2
    }

    pub fn samples(&self) -> Vec<i16> {
        self.bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

// =============================================================================
// Sample rate
// =============================================================================

/// Output sample rate accepted by the downstream consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SampleRate(u32);

impl SampleRate {
    /// Accepted output rates in Hz.
    pub const SUPPORTED: [u32; 5] = [8000, 16000, 22050, 24000, 44100];

    pub const HZ_8000: SampleRate = SampleRate(8000);
    pub const HZ_16000: SampleRate = SampleRate(16000);
    pub const HZ_22050: SampleRate = SampleRate(22050);
    pub const HZ_24000: SampleRate = SampleRate(24000);
    pub const HZ_44100: SampleRate = SampleRate(44100);

    pub fn hz(self) -> u32 {
        self.0
    }

    pub fn is_supported(hz: u32) -> bool {
        Self::SUPPORTED.contains(&hz)
    }
}

impl Default for SampleRate {
    fn default() -> Self {
        Self::HZ_24000
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = AudioError;

    fn try_from(hz: u32) -> AudioResult<Self> {
        if Self::is_supported(hz) {
            Ok(Self(hz))
        } else {
            Err(AudioError::SampleRateUnsupported(hz))
        }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Tier + degradation bookkeeping
// =============================================================================

/// Conversion strategies in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionTier {
    /// Full decode + channel-average downmix + sinc resampling
    FastVectorized,
    /// WAV extraction + left-channel downmix, no resampling
    ContainerNative,
    /// Original bytes, untouched
    PassThrough,
}

impl ConversionTier {
    pub const ORDER: [ConversionTier; 3] = [
        ConversionTier::FastVectorized,
        ConversionTier::ContainerNative,
        ConversionTier::PassThrough,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FastVectorized => "fast_vectorized",
            Self::ContainerNative => "container_native",
            Self::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for ConversionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a successful result does not meet the canonical contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// Container-native path returned audio at the source rate
    RateMismatch { source_hz: u32, target_hz: u32 },
    /// Downmix skipped: more than two channels or not 16-bit
    LayoutUnsupported { channels: u16, bit_depth: u16 },
    /// Upstream bytes returned verbatim
    PassThrough,
}

impl Degradation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateMismatch { .. } => "rate_mismatch",
            Self::LayoutUnsupported { .. } => "layout_unsupported",
            Self::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateMismatch {
                source_hz,
                target_hz,
            } => write!(f, "rate_mismatch ({source_hz} Hz != {target_hz} Hz)"),
            Self::LayoutUnsupported {
                channels,
                bit_depth,
            } => write!(f, "layout_unsupported ({channels} ch, {bit_depth}-bit)"),
            Self::PassThrough => f.write_str("pass_through"),
        }
    }
}

/// Result of [`ResampleEngine::normalize`](super::ResampleEngine::normalize).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAudio {
    pub pcm: CanonicalPcm,
    /// Tier that produced `pcm`
    pub tier: ConversionTier,
    pub degradation: Option<Degradation>,
    /// Rate the bytes are actually at, when known
    pub sample_rate_hz: Option<u32>,
}

impl NormalizedAudio {
    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }
}
