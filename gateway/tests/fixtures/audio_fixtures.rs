//! Audio Test Fixtures
//!
//! WAV containers are written with `hound` so the tests never depend on
//! files on disk. Hand-assembled variants cover chunk layouts `hound` will
//! not produce (extra chunks before `data`, odd-sized chunks).

use std::f32::consts::PI;
use std::io::Cursor;

/// Interleaved sine wave, identical on every channel.
pub fn generate_sine_wave(
    frames: usize,
    channels: u16,
    sample_rate: u32,
    frequency: f32,
    amplitude: f32,
) -> Vec<i16> {
    let peak = amplitude * i16::MAX as f32;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for n in 0..frames {
        let t = n as f32 / sample_rate as f32;
        let value = (peak * (2.0 * PI * frequency * t).sin()) as i16;
        for _ in 0..channels {
            samples.push(value);
        }
    }
    samples
}

/// Stereo frames whose left and right channels are distinguishable.
pub fn generate_split_stereo(frames: usize) -> Vec<i16> {
    (0..frames)
        .flat_map(|n| [n as i16, -(n as i16) - 1])
        .collect()
}

/// 16-bit PCM WAV written by `hound`.
pub fn create_wav_file(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// 24-bit PCM WAV written by `hound`; the native path cannot downmix it.
pub fn create_wav_file_24bit(samples: &[i32], channels: u16, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// WAV with a `LIST` chunk and an odd-sized custom chunk ahead of `data`.
pub fn create_wav_with_extra_chunks(samples: &[i16], channels: u16, sample_rate: u32) -> Vec<u8> {
    let data = samples_to_bytes(samples);
    let block_align = channels * 2;

    let mut body = b"WAVE".to_vec();
    body.extend_from_slice(b"LIST");
    body.extend_from_slice(&4u32.to_le_bytes());
    body.extend_from_slice(b"INFO");

    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&16u32.to_le_bytes());
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(&channels.to_le_bytes());
    body.extend_from_slice(&sample_rate.to_le_bytes());
    body.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    body.extend_from_slice(&block_align.to_le_bytes());
    body.extend_from_slice(&16u16.to_le_bytes());

    // Odd size: followed by one pad byte
    body.extend_from_slice(b"xtra");
    body.extend_from_slice(&3u32.to_le_bytes());
    body.extend_from_slice(&[7, 7, 7, 0]);

    body.extend_from_slice(b"data");
    body.extend_from_slice(&(data.len() as u32).to_le_bytes());
    body.extend_from_slice(&data);

    let mut wav = b"RIFF".to_vec();
    wav.extend_from_slice(&(body.len() as u32).to_le_bytes());
    wav.extend_from_slice(&body);
    wav
}

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, mono, no CRC.
const MP3_SILENT_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0xC4];
/// `144 * 128000 / 44100` with no padding bit.
const MP3_FRAME_LEN: usize = 417;
pub const MP3_SAMPLES_PER_FRAME: usize = 1152;
pub const MP3_SAMPLE_RATE: u32 = 44100;

/// Raw MP3 stream of silent frames.
///
/// Zeroed side info means no Huffman data, so every granule decodes to
/// silence.
pub fn create_silent_mp3(frames: usize) -> Vec<u8> {
    let mut mp3 = Vec::with_capacity(frames * MP3_FRAME_LEN);
    for _ in 0..frames {
        mp3.extend_from_slice(&MP3_SILENT_FRAME_HEADER);
        mp3.resize(mp3.len() + MP3_FRAME_LEN - MP3_SILENT_FRAME_HEADER.len(), 0);
    }
    mp3
}

/// Convert i16 samples to little-endian bytes
pub fn samples_to_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

/// Convert little-endian bytes to i16 samples
pub fn bytes_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Left channel of interleaved stereo samples.
pub fn left_samples(interleaved: &[i16]) -> Vec<i16> {
    interleaved.chunks_exact(2).map(|frame| frame[0]).collect()
}

/// Peak absolute amplitude
pub fn calculate_peak(samples: &[i16]) -> i16 {
    samples
        .iter()
        .map(|s| s.saturating_abs())
        .max()
        .unwrap_or(0)
}

/// Root mean square amplitude
pub fn calculate_rms(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}
