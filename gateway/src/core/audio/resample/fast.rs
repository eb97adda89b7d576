//! Tier 1: full decode, channel-average downmix and sinc resampling.
//!
//! Backed by `symphonia` (container + codec decode) and `rubato` (rate
//! conversion). Without the `fast-resample` feature the strategy reports
//! `ConversionBackendUnavailable` so the engine moves on.
//!
//! A WAV that is already mono 16-bit at the target rate is returned with its
//! `data` bytes untouched; decoding it to float and back is lossy.

use tracing::debug;

use super::ConversionStrategy;
use crate::core::audio::error::{AudioError, AudioResult};
use crate::core::audio::format::{AudioFormat, sniff};
use crate::core::audio::types::{
    AudioBuffer, CanonicalPcm, ConversionTier, NormalizedAudio, SampleRate,
};
use crate::core::audio::wav::read_wav;

/// Decode-anything strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastVectorizedStrategy;

impl FastVectorizedStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl ConversionStrategy for FastVectorizedStrategy {
    fn tier(&self) -> ConversionTier {
        ConversionTier::FastVectorized
    }

    fn convert(&self, buffer: &AudioBuffer, target: SampleRate) -> AudioResult<NormalizedAudio> {
        let format = sniff(buffer)?;
        let extension = match format {
            AudioFormat::Wav => "wav",
            AudioFormat::Mp3 => "mp3",
            other => {
                return Err(AudioError::UnsupportedFormat(format!(
                    "no decoder for {other} payload"
                )));
            }
        };

        if format == AudioFormat::Wav {
            if let Some(audio) = canonical_wav(buffer, target) {
                return Ok(audio);
            }
        }

        let (samples, source_rate) = backend::decode_to_mono(buffer, extension)?;
        let resampled = if source_rate == target.hz() {
            samples
        } else {
            backend::resample(&samples, source_rate, target.hz())?
        };

        debug!(
            source_rate = source_rate,
            target_rate = target.hz(),
            samples = resampled.len(),
            "Decoded and resampled to mono"
        );

        Ok(NormalizedAudio {
            pcm: CanonicalPcm::from_samples(&quantize(&resampled)),
            tier: ConversionTier::FastVectorized,
            degradation: None,
            sample_rate_hz: Some(target.hz()),
        })
    }
}

/// Mono 16-bit WAV already at `target`: the `data` chunk is the answer.
/// Any parse failure defers to the full decoder.
fn canonical_wav(buffer: &AudioBuffer, target: SampleRate) -> Option<NormalizedAudio> {
    let decoded = read_wav(buffer.bytes()).ok()?;
    if !decoded.is_mono_pcm16() || decoded.sample_rate_hz != target.hz() {
        return None;
    }

    debug!(
        frames = decoded.frame_count(),
        rate = decoded.sample_rate_hz,
        "WAV already canonical, returning data chunk"
    );

    Some(NormalizedAudio {
        pcm: CanonicalPcm::from_le_bytes(decoded.data),
        tier: ConversionTier::FastVectorized,
        degradation: None,
        sample_rate_hz: Some(target.hz()),
    })
}

/// `round(s * 32767)` clamped to the i16 range.
pub fn quantize(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect()
}

#[cfg(feature = "fast-resample")]
mod backend {
    use std::io::Cursor;

    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
        WindowFunction,
    };
    use symphonia::core::audio::SampleBuffer;
    use symphonia::core::codecs::DecoderOptions;
    use symphonia::core::errors::Error as SymphoniaError;
    use symphonia::core::formats::FormatOptions;
    use symphonia::core::io::MediaSourceStream;
    use symphonia::core::meta::MetadataOptions;
    use symphonia::core::probe::Hint;
    use tracing::warn;

    use crate::core::audio::downmix::average_channels;
    use crate::core::audio::error::{AudioError, AudioResult};
    use crate::core::audio::types::AudioBuffer;

    const CHUNK_SIZE: usize = 1024;

    /// Decode to mono f32 in [-1, 1], returning the source sample rate.
    pub fn decode_to_mono(buffer: &AudioBuffer, extension: &str) -> AudioResult<(Vec<f32>, u32)> {
        let cursor = Cursor::new(buffer.bytes().clone());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension(extension);

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::DecodeFailed(format!("probe: {e}")))?;
        let mut reader = probed.format;

        let track = reader
            .default_track()
            .ok_or_else(|| AudioError::DecodeFailed("no audio track found".to_string()))?;
        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeFailed(format!("codec: {e}")))?;

        let mut source_rate = codec_params.sample_rate;
        let mut mono: Vec<f32> = Vec::new();

        loop {
            let packet = match reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => return Err(AudioError::DecodeFailed(format!("packet: {e}"))),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!(error = %e, "Skipping corrupt audio frame");
                    continue;
                }
                Err(e) => return Err(AudioError::DecodeFailed(format!("decode: {e}"))),
            };

            let spec = *decoded.spec();
            let frames = decoded.frames();
            if frames == 0 {
                continue;
            }
            source_rate.get_or_insert(spec.rate);

            let mut samples = SampleBuffer::<f32>::new(frames as u64, spec);
            samples.copy_interleaved_ref(decoded);
            mono.extend(average_channels(samples.samples(), spec.channels.count()));
        }

        let source_rate = source_rate
            .ok_or_else(|| AudioError::DecodeFailed("unknown sample rate".to_string()))?;
        if mono.is_empty() {
            return Err(AudioError::DecodeFailed(
                "no audio samples decoded".to_string(),
            ));
        }
        Ok((mono, source_rate))
    }

    /// Sinc resampling; output length is exactly `len * to / from` samples.
    pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> AudioResult<Vec<f32>> {
        let params = SincInterpolationParameters {
            sinc_len: 256,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };
        let ratio = to_rate as f64 / from_rate as f64;

        let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_SIZE, 1)
            .map_err(|e| AudioError::DecodeFailed(format!("resampler init: {e}")))?;

        let expected_len = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
        let mut output = Vec::with_capacity(expected_len + CHUNK_SIZE);

        for chunk in samples.chunks(CHUNK_SIZE) {
            let mut input = chunk.to_vec();
            input.resize(CHUNK_SIZE, 0.0);
            let result = resampler
                .process(&[input], None)
                .map_err(|e| AudioError::DecodeFailed(format!("resample: {e}")))?;
            if let Some(channel) = result.first() {
                output.extend_from_slice(channel);
            }
        }

        output.resize(expected_len, 0.0);
        Ok(output)
    }
}

#[cfg(not(feature = "fast-resample"))]
mod backend {
    use crate::core::audio::error::{AudioError, AudioResult};
    use crate::core::audio::types::AudioBuffer;

    pub fn decode_to_mono(_buffer: &AudioBuffer, _extension: &str) -> AudioResult<(Vec<f32>, u32)> {
        Err(AudioError::ConversionBackendUnavailable(
            "built without the fast-resample feature".to_string(),
        ))
    }

    pub fn resample(_samples: &[f32], _from_rate: u32, _to_rate: u32) -> AudioResult<Vec<f32>> {
        Err(AudioError::ConversionBackendUnavailable(
            "built without the fast-resample feature".to_string(),
        ))
    }
}
