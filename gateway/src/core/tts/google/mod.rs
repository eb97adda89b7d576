//! Google Cloud Text-to-Speech (REST)
//!
//! Calls `text:synthesize` with an API key. The answer is JSON carrying a
//! base64 WAV in `audioContent`, which the adapter unwraps itself; only
//! non-200 replies go through the generic dispatcher.
//!
//! Google has no model axis, so no model fallback is ever attempted.

mod config;
mod provider;

pub use config::GoogleRestConfig;
pub use provider::GoogleRestAdapter;

pub use crate::config::DEFAULT_GOOGLE_TTS_URL as GOOGLE_TTS_URL;
