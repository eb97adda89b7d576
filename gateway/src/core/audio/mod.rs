//! Audio normalization pipeline.
//!
//! Sniff → (WAV extraction → left-channel downmix) or full decode → resample,
//! producing 16-bit little-endian mono PCM for the voice consumer.

pub mod downmix;
pub mod error;
pub mod format;
pub mod resample;
pub mod types;
pub mod wav;

pub use error::{AudioError, AudioResult};
pub use format::{AudioFormat, sniff};
pub use resample::{ConversionStrategy, ResampleEngine};
pub use types::{
    AudioBuffer, CanonicalPcm, ConversionTier, DecodedAudio, Degradation, NormalizedAudio,
    SampleRate,
};
pub use wav::read_wav;
