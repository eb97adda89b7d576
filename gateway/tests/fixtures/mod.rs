//! Test Fixtures Module
//!
//! Programmatically generated WAV containers and PCM helpers shared by the
//! integration tests.

// Not every test binary uses every helper
#![allow(dead_code)]

pub mod audio_fixtures;

pub use audio_fixtures::*;
