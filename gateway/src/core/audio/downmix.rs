//! Channel reduction to mono.
//!
//! Two policies live here and they are intentionally different:
//! the container-native path keeps the left channel of 16-bit stereo, while
//! the decode path averages every channel of float samples.

use bytes::{Bytes, BytesMut};

use super::types::DecodedAudio;

/// Result of the container-native downmix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Downmixed {
    /// 16-bit little-endian mono bytes
    Mono(Bytes),
    /// Layout the native path does not handle; the caller keeps the source bytes
    Unsupported { channels: u16, bit_depth: u16 },
}

/// Collapse 16-bit mono or stereo frames to mono by keeping the left channel.
///
/// Mono input is returned without copying. For stereo, bytes `[4k, 4k+1]` of
/// every frame `k` are kept and `[4k+2, 4k+3]` dropped. A trailing partial
/// frame is discarded.
pub fn left_channel(audio: &DecodedAudio) -> Downmixed {
    if audio.bit_depth_bits != 16 || audio.channel_count > 2 || audio.channel_count == 0 {
        return Downmixed::Unsupported {
            channels: audio.channel_count,
            bit_depth: audio.bit_depth_bits,
        };
    }
    if audio.channel_count == 1 {
        return Downmixed::Mono(audio.data.clone());
    }

    let mut mono = BytesMut::with_capacity(audio.data.len() / 2);
    for frame in audio.data.chunks_exact(4) {
        mono.extend_from_slice(&frame[..2]);
    }
    Downmixed::Mono(mono.freeze())
}

/// Average interleaved float frames across `channels`.
pub fn average_channels(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}
