//! HTTP request handlers
//!
//! - `api` - Health check and service descriptor
//! - `tts` - Text-to-speech endpoint returning canonical PCM

pub mod api;
pub mod tts;

pub use tts::tts_handler;
