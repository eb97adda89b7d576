//! Content-based classification of upstream audio payloads.

use std::fmt;

use tracing::debug;

use super::error::{AudioError, AudioResult};
use super::types::AudioBuffer;

/// Below this many bytes the RIFF/WAVE signature cannot be checked.
pub const MIN_SNIFF_LEN: usize = 12;

/// Detected payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Json,
    Unknown,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Json => "json",
            Self::Unknown => "unknown",
        }
    }

    /// Map a normalized content type to a format.
    pub fn from_content_type(content_type: &str) -> Self {
        match content_type {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Self::Wav,
            "audio/mpeg" | "audio/mp3" | "audio/mpeg3" | "audio/x-mpeg-3" => Self::Mp3,
            "application/json" | "text/json" => Self::Json,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify raw bytes only, ignoring any declared content type.
pub fn sniff_bytes(data: &[u8]) -> AudioFormat {
    if data.len() >= MIN_SNIFF_LEN && data.starts_with(b"RIFF") && &data[8..12] == b"WAVE" {
        return AudioFormat::Wav;
    }
    match data.first() {
        Some(b'{') | Some(b'[') => return AudioFormat::Json,
        None => return AudioFormat::Unknown,
        _ => {}
    }
    // ID3v2 tag or MPEG frame sync (11 set bits)
    if data.starts_with(b"ID3") || (data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0)
    {
        return AudioFormat::Mp3;
    }
    AudioFormat::Unknown
}

/// Classify a buffer.
///
/// Bytes win over the declared content type; the content type only turns an
/// `Unknown` verdict into something more specific. Buffers shorter than
/// [`MIN_SNIFF_LEN`] are classified by content type alone and rejected with
/// `UnsupportedFormat` if that is absent or unrecognised.
pub fn sniff(buffer: &AudioBuffer) -> AudioResult<AudioFormat> {
    let declared = buffer
        .declared_content_type()
        .map(AudioFormat::from_content_type)
        .unwrap_or(AudioFormat::Unknown);

    if buffer.len() < MIN_SNIFF_LEN {
        return match declared {
            AudioFormat::Unknown => Err(AudioError::UnsupportedFormat(format!(
                "{} bytes is too short to identify (content type: {})",
                buffer.len(),
                buffer.declared_content_type().unwrap_or("none")
            ))),
            format => {
                debug!(format = %format, bytes = buffer.len(), "Short buffer classified by content type");
                Ok(format)
            }
        };
    }

    let format = match sniff_bytes(buffer.bytes()) {
        AudioFormat::Unknown => declared,
        detected => detected,
    };
    debug!(format = %format, bytes = buffer.len(), "Sniffed audio format");
    Ok(format)
}
