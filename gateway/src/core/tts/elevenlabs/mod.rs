//! ElevenLabs text-to-speech
//!
//! `POST {url}/{voice_id}?output_format=...` with `xi-api-key`. Replies are
//! binary audio (sometimes labelled `text/plain`) or JSON errors. Alpha
//! models such as `eleven_v3` are not enabled on every account; a denial is
//! retried once with the fallback model.

mod config;
mod provider;

pub use config::ElevenLabsConfig;
pub use provider::ElevenLabsAdapter;

pub use crate::config::DEFAULT_ELEVENLABS_TTS_URL as ELEVENLABS_TTS_URL;
