//! RIFF/WAVE container extraction.
//!
//! Pulls the `fmt ` parameters and the raw `data` bytes out of a WAV file.
//! Chunks may appear in any order; anything that is not `fmt ` or `data` is
//! skipped using its declared size. No sample conversion happens here.

use bytes::Bytes;
use tracing::{debug, warn};

use super::error::{AudioError, AudioResult};
use super::types::DecodedAudio;

const RIFF_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;
const FMT_MIN_LEN: usize = 16;

/// Streaming encoders write this when the final size is not known up front.
const UNKNOWN_CHUNK_SIZE: u32 = u32::MAX;

/// Parameters from the `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// 1 = integer PCM, 3 = IEEE float, 0xFFFE = extensible
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

fn read_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

fn read_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

fn parse_fmt(body: &[u8]) -> AudioResult<WavFormat> {
    if body.len() < FMT_MIN_LEN {
        return Err(AudioError::MalformedContainer(format!(
            "fmt chunk is {} bytes, expected at least {FMT_MIN_LEN}",
            body.len()
        )));
    }
    let format = WavFormat {
        format_tag: read_u16(body, 0),
        channels: read_u16(body, 2),
        sample_rate: read_u32(body, 4),
        bits_per_sample: read_u16(body, 14),
    };
    if format.channels == 0 || format.sample_rate == 0 || format.bits_per_sample == 0 {
        return Err(AudioError::MalformedContainer(format!(
            "invalid fmt parameters: {} channels, {} Hz, {} bits",
            format.channels, format.sample_rate, format.bits_per_sample
        )));
    }
    Ok(format)
}

/// Parse a WAV container held in `bytes`.
///
/// The returned `data` is a zero-copy slice of the input.
pub fn read_wav(bytes: &Bytes) -> AudioResult<DecodedAudio> {
    if bytes.len() < RIFF_HEADER_LEN || !bytes.starts_with(b"RIFF") || &bytes[8..12] != b"WAVE" {
        return Err(AudioError::MalformedContainer(
            "missing RIFF/WAVE header".to_string(),
        ));
    }

    let mut format: Option<WavFormat> = None;
    let mut data: Option<Bytes> = None;
    let mut offset = RIFF_HEADER_LEN;

    while offset + CHUNK_HEADER_LEN <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let declared = read_u32(bytes, offset + 4);
        let body_start = offset + CHUNK_HEADER_LEN;
        let available = bytes.len() - body_start;

        match id {
            b"fmt " => {
                let size = declared as usize;
                if size > available {
                    return Err(AudioError::MalformedContainer(format!(
                        "fmt chunk declares {size} bytes, only {available} present"
                    )));
                }
                format = Some(parse_fmt(&bytes[body_start..body_start + size])?);
            }
            b"data" => {
                let size = if declared == UNKNOWN_CHUNK_SIZE || declared as usize > available {
                    if declared != UNKNOWN_CHUNK_SIZE {
                        warn!(
                            declared = declared,
                            available = available,
                            "WAV data chunk truncated, using available bytes"
                        );
                    }
                    available
                } else {
                    declared as usize
                };
                data = Some(bytes.slice(body_start..body_start + size));
            }
            other => {
                debug!(
                    chunk = %String::from_utf8_lossy(other),
                    size = declared,
                    "Skipping WAV chunk"
                );
                if declared as usize > available {
                    return Err(AudioError::MalformedContainer(format!(
                        "chunk '{}' declares {declared} bytes, only {available} present",
                        String::from_utf8_lossy(other)
                    )));
                }
            }
        }

        if format.is_some() && data.is_some() {
            break;
        }

        // Chunk bodies are word aligned.
        let size = declared as usize;
        offset = body_start.saturating_add(size).saturating_add(size & 1);
    }

    let format = format
        .ok_or_else(|| AudioError::MalformedContainer("missing fmt chunk".to_string()))?;
    let data =
        data.ok_or_else(|| AudioError::MalformedContainer("missing data chunk".to_string()))?;

    debug!(
        channels = format.channels,
        sample_rate = format.sample_rate,
        bits = format.bits_per_sample,
        bytes = data.len(),
        "Parsed WAV container"
    );

    Ok(DecodedAudio {
        data,
        channel_count: format.channels,
        sample_rate_hz: format.sample_rate,
        bit_depth_bits: format.bits_per_sample,
    })
}
