//! Synthetic audio for demo mode.

use std::f32::consts::PI;

use crate::core::audio::{CanonicalPcm, SampleRate};

pub const DEMO_TONE_HZ: f32 = 440.0;
pub const DEMO_DURATION_SECS: u32 = 2;
pub const DEMO_AMPLITUDE: f32 = 16383.0;

/// A 2 second 440 Hz sine as mono PCM16 at `rate`.
pub fn demo_tone(rate: SampleRate) -> CanonicalPcm {
    let total = (rate.hz() * DEMO_DURATION_SECS) as usize;
    let samples: Vec<i16> = (0..total)
        .map(|n| {
            let t = n as f32 / rate.hz() as f32;
            (DEMO_AMPLITUDE * (2.0 * PI * DEMO_TONE_HZ * t).sin()) as i16
        })
        .collect();
    CanonicalPcm::from_samples(&samples)
}
