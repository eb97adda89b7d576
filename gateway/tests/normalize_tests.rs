//! Normalization pipeline tests against generated WAV containers.

mod fixtures;

use bytes::Bytes;
use fixtures::*;
use tts_pcm_gateway::core::audio::resample::{
    ContainerNativeStrategy, ConversionStrategy, PassThroughStrategy,
};
use tts_pcm_gateway::core::audio::{
    AudioBuffer, AudioError, AudioResult, ConversionTier, Degradation, NormalizedAudio,
    ResampleEngine, SampleRate, read_wav,
};
use tts_pcm_gateway::ServerConfig;
use tts_pcm_gateway::core::capabilities::Capabilities;

fn native_engine() -> ResampleEngine {
    ResampleEngine::new(&Capabilities {
        fast_vectorized: false,
        demo_mode: false,
    })
}

fn wav_buffer(wav: Vec<u8>) -> AudioBuffer {
    AudioBuffer::new(wav).with_content_type("audio/wav")
}

/// Tier 1 stand-in whose backend is missing.
struct MissingBackend;

impl ConversionStrategy for MissingBackend {
    fn tier(&self) -> ConversionTier {
        ConversionTier::FastVectorized
    }

    fn convert(&self, _buffer: &AudioBuffer, _target: SampleRate) -> AudioResult<NormalizedAudio> {
        Err(AudioError::ConversionBackendUnavailable("not installed".to_string()))
    }
}

#[test]
fn test_mono_wav_at_target_rate_is_identity() {
    let samples = generate_sine_wave(2400, 1, 24000, 440.0, 0.5);
    let wav = create_wav_file(&samples, 1, 24000);
    let expected = read_wav(&Bytes::from(wav.clone())).unwrap().data;

    let normalized = native_engine()
        .normalize(&wav_buffer(wav), SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(normalized.tier, ConversionTier::ContainerNative);
    assert_eq!(normalized.pcm.bytes(), &expected);
    assert_eq!(normalized.pcm.bytes().as_ref(), samples_to_bytes(&samples).as_slice());
    assert!(!normalized.is_degraded());
}

#[test]
fn test_default_engine_returns_canonical_wav_data_unchanged() {
    let samples = [32767i16, 16384, -32768, 1000, -1, 30000];
    let wav = create_wav_file(&samples, 1, 24000);
    let expected = read_wav(&Bytes::from(wav.clone())).unwrap().data;

    let engine = ResampleEngine::new(&Capabilities::probe(&ServerConfig::default()));
    let normalized = engine
        .normalize(&wav_buffer(wav), SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(normalized.pcm.bytes(), &expected);
    assert_eq!(normalized.pcm.samples(), samples.to_vec());
    assert_eq!(normalized.sample_rate_hz, Some(24000));
    assert!(!normalized.is_degraded());
}

#[test]
fn test_mp3_skips_native_tier_and_passes_through() {
    let mp3 = create_silent_mp3(8);
    let buffer = AudioBuffer::new(mp3.clone()).with_content_type("audio/mpeg");

    let err = ContainerNativeStrategy::new()
        .convert(&buffer, SampleRate::HZ_16000)
        .unwrap_err();
    assert!(matches!(err, AudioError::UnsupportedFormat(_)));

    let normalized = native_engine()
        .normalize(&buffer, SampleRate::HZ_16000)
        .unwrap();
    assert_eq!(normalized.tier, ConversionTier::PassThrough);
    assert_eq!(normalized.degradation, Some(Degradation::PassThrough));
    assert_eq!(normalized.pcm.bytes().as_ref(), mp3.as_slice());
}

#[test]
fn test_stereo_wav_keeps_left_channel() {
    let interleaved = generate_split_stereo(1000);
    let wav = create_wav_file(&interleaved, 2, 24000);

    let normalized = native_engine()
        .normalize(&wav_buffer(wav), SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(normalized.tier, ConversionTier::ContainerNative);
    let data_len = interleaved.len() * 2;
    assert_eq!(normalized.pcm.len(), data_len / 2);
    assert_eq!(bytes_to_samples(normalized.pcm.bytes()), left_samples(&interleaved));
    assert!(!normalized.is_degraded());
}

#[test]
fn test_stereo_downmix_keeps_bytes_4k_and_4k_plus_1() {
    let mut interleaved = generate_sine_wave(500, 2, 16000, 1000.0, 0.8);
    for frame in interleaved.chunks_exact_mut(2) {
        frame[1] = frame[1].wrapping_add(17);
    }
    let raw = samples_to_bytes(&interleaved);
    let wav = create_wav_file(&interleaved, 2, 16000);

    let normalized = native_engine()
        .normalize(&wav_buffer(wav), SampleRate::HZ_16000)
        .unwrap();

    let expected: Vec<u8> = raw
        .chunks_exact(4)
        .flat_map(|frame| [frame[0], frame[1]])
        .collect();
    assert_eq!(normalized.pcm.bytes().as_ref(), expected.as_slice());
}

#[test]
fn test_extra_chunks_are_skipped() {
    let samples = generate_sine_wave(333, 1, 22050, 300.0, 0.3);
    let wav = create_wav_with_extra_chunks(&samples, 1, 22050);

    let normalized = native_engine()
        .normalize(&wav_buffer(wav), SampleRate::HZ_22050)
        .unwrap();

    assert_eq!(bytes_to_samples(normalized.pcm.bytes()), samples);
}

#[test]
fn test_rate_mismatch_is_flagged_not_fixed() {
    let samples = generate_sine_wave(4410, 1, 44100, 440.0, 0.5);
    let wav = create_wav_file(&samples, 1, 44100);

    let normalized = native_engine()
        .normalize(&wav_buffer(wav), SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(normalized.tier, ConversionTier::ContainerNative);
    assert_eq!(bytes_to_samples(normalized.pcm.bytes()), samples);
    assert_eq!(
        normalized.degradation,
        Some(Degradation::RateMismatch {
            source_hz: 44100,
            target_hz: 24000
        })
    );
    assert_eq!(normalized.sample_rate_hz, Some(44100));
}

#[test]
fn test_24bit_layout_is_flagged() {
    let samples: Vec<i32> = (0..300).map(|n| n * 1000).collect();
    let wav = create_wav_file_24bit(&samples, 1, 24000);

    let normalized = ContainerNativeStrategy::new()
        .convert(&wav_buffer(wav), SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(
        normalized.degradation,
        Some(Degradation::LayoutUnsupported {
            channels: 1,
            bit_depth: 24
        })
    );
    assert_eq!(normalized.pcm.len() % 2, 0);
}

#[test]
fn test_missing_fast_backend_equals_native_result() {
    let interleaved = generate_split_stereo(800);
    let buffer = wav_buffer(create_wav_file(&interleaved, 2, 24000));

    let chained = ResampleEngine::with_strategies(vec![
        Box::new(MissingBackend),
        Box::new(ContainerNativeStrategy::new()),
        Box::new(PassThroughStrategy::new()),
    ])
    .normalize(&buffer, SampleRate::HZ_24000)
    .unwrap();
    let native_only = ContainerNativeStrategy::new()
        .convert(&buffer, SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(chained, native_only);
}

#[test]
fn test_undecodable_input_passes_through_unmodified() {
    let mut payload = b"OggS".to_vec();
    payload.extend((0u8..=200).collect::<Vec<_>>());
    let buffer = AudioBuffer::new(payload.clone()).with_content_type("audio/ogg");

    let normalized = native_engine()
        .normalize(&buffer, SampleRate::HZ_24000)
        .unwrap();

    assert_eq!(normalized.tier, ConversionTier::PassThrough);
    assert_eq!(normalized.degradation, Some(Degradation::PassThrough));
    assert_eq!(normalized.pcm.bytes().as_ref(), payload.as_slice());
}

#[test]
fn test_truncated_wav_falls_to_pass_through() {
    let mut wav = b"RIFF\x00\x00\x00\x00WAVEfmt \x10\x00".to_vec();
    wav.extend_from_slice(&[0; 4]);
    let normalized = native_engine()
        .normalize(&wav_buffer(wav.clone()), SampleRate::HZ_16000)
        .unwrap();

    assert_eq!(normalized.tier, ConversionTier::PassThrough);
    assert_eq!(normalized.pcm.bytes().as_ref(), wav.as_slice());
}

#[test]
fn test_empty_input_is_rejected() {
    let err = native_engine()
        .normalize(&AudioBuffer::new(Vec::new()), SampleRate::HZ_24000)
        .unwrap_err();
    assert_eq!(err, AudioError::EmptyInput);
}

#[test]
fn test_unsupported_target_rate_is_rejected_before_the_pipeline() {
    assert_eq!(
        SampleRate::try_from(48000).unwrap_err(),
        AudioError::SampleRateUnsupported(48000)
    );
    for hz in SampleRate::SUPPORTED {
        assert_eq!(SampleRate::try_from(hz).unwrap().hz(), hz);
    }
}

#[cfg(feature = "fast-resample")]
mod fast_tier {
    use super::*;
    use tts_pcm_gateway::core::audio::resample::FastVectorizedStrategy;

    fn fast_engine() -> ResampleEngine {
        ResampleEngine::new(&Capabilities {
            fast_vectorized: true,
            demo_mode: false,
        })
    }

    #[test]
    fn test_fast_tier_output_length_matches_target_rate() {
        let interleaved = generate_sine_wave(44100, 2, 44100, 440.0, 0.5);
        let buffer = wav_buffer(create_wav_file(&interleaved, 2, 44100));

        let normalized = fast_engine()
            .normalize(&buffer, SampleRate::HZ_16000)
            .unwrap();

        assert_eq!(normalized.tier, ConversionTier::FastVectorized);
        assert_eq!(normalized.sample_rate_hz, Some(16000));
        assert!(!normalized.is_degraded());
        // One second of mono audio at 16 kHz
        assert_eq!(normalized.pcm.sample_count(), 16000);
        assert!(calculate_peak(&normalized.pcm.samples()) > 10000);
    }

    #[test]
    fn test_fast_tier_same_rate_mono_pcm16_is_exact() {
        let samples = generate_sine_wave(2400, 1, 24000, 440.0, 0.5);
        let buffer = wav_buffer(create_wav_file(&samples, 1, 24000));

        let normalized = FastVectorizedStrategy::new()
            .convert(&buffer, SampleRate::HZ_24000)
            .unwrap();

        assert_eq!(normalized.tier, ConversionTier::FastVectorized);
        assert_eq!(normalized.pcm.samples(), samples);
    }

    #[test]
    fn test_fast_tier_same_rate_24bit_is_near_identity() {
        let samples: Vec<i32> = generate_sine_wave(2400, 1, 24000, 440.0, 0.5)
            .into_iter()
            .map(|s| (s as i32) << 8)
            .collect();
        let buffer = wav_buffer(create_wav_file_24bit(&samples, 1, 24000));

        let normalized = FastVectorizedStrategy::new()
            .convert(&buffer, SampleRate::HZ_24000)
            .unwrap();

        let output = normalized.pcm.samples();
        assert_eq!(output.len(), samples.len());
        for (out, src) in output.iter().zip(&samples) {
            assert!((*out as i32 - (*src >> 8)).abs() <= 1);
        }
    }

    #[test]
    fn test_fast_tier_decodes_mp3() {
        let frames = 40;
        let buffer = AudioBuffer::new(create_silent_mp3(frames)).with_content_type("audio/mpeg");

        let normalized = FastVectorizedStrategy::new()
            .convert(&buffer, SampleRate::HZ_16000)
            .unwrap();

        assert_eq!(normalized.tier, ConversionTier::FastVectorized);
        assert_eq!(normalized.sample_rate_hz, Some(16000));
        assert!(!normalized.is_degraded());
        assert!(!normalized.pcm.is_empty());
        assert_eq!(normalized.pcm.len() % 2, 0);
        // Never more than the full frame count at the target rate
        let max_samples =
            frames * MP3_SAMPLES_PER_FRAME * 16000 / MP3_SAMPLE_RATE as usize + 1;
        assert!(normalized.pcm.sample_count() <= max_samples);
        assert!(calculate_peak(&normalized.pcm.samples()) < 64);
    }

    #[test]
    fn test_fast_engine_prefers_decoder_for_mp3() {
        let buffer = AudioBuffer::new(create_silent_mp3(40)).with_content_type("audio/mpeg");

        let normalized = fast_engine()
            .normalize(&buffer, SampleRate::HZ_24000)
            .unwrap();

        assert_eq!(normalized.tier, ConversionTier::FastVectorized);
        assert_eq!(normalized.sample_rate_hz, Some(24000));
    }

    #[test]
    fn test_fast_tier_averages_channels() {
        let mut interleaved = Vec::new();
        for _ in 0..2400 {
            interleaved.extend_from_slice(&[8000i16, 0]);
        }
        let buffer = wav_buffer(create_wav_file(&interleaved, 2, 24000));

        let normalized = FastVectorizedStrategy::new()
            .convert(&buffer, SampleRate::HZ_24000)
            .unwrap();

        for sample in normalized.pcm.samples() {
            assert!((sample as i32 - 4000).abs() <= 1);
        }
    }

    #[test]
    fn test_fast_tier_is_idempotent() {
        let interleaved = generate_sine_wave(22050, 2, 22050, 220.0, 0.7);
        let buffer = wav_buffer(create_wav_file(&interleaved, 2, 22050));

        let engine = fast_engine();
        let first = engine.normalize(&buffer, SampleRate::HZ_8000).unwrap();
        let second = engine.normalize(&buffer, SampleRate::HZ_8000).unwrap();

        assert_eq!(first.pcm, second.pcm);
        assert_eq!(first.pcm.len() % 2, 0);
    }
}
