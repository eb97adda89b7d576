//! Deepdub text-to-speech
//!
//! One POST per utterance. Deepdub may answer with a WAV body, with JSON
//! pointing at a file (`{"audioUrl": ...}`), or with an error; all three are
//! sorted out by the response dispatcher. Newer models can be gated per
//! account, so a denied primary model is retried once with the fallback.

mod config;
mod provider;

pub use config::DeepdubConfig;
pub use provider::DeepdubAdapter;

pub use crate::config::DEFAULT_DEEPDUB_TTS_URL as DEEPDUB_TTS_URL;
