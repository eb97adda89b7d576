pub mod audio;
pub mod capabilities;
pub mod demo;
pub mod orchestrator;
pub mod tts;

// Re-export commonly used types for convenience
pub use audio::{
    AudioBuffer, AudioError, AudioResult, CanonicalPcm, ConversionTier, Degradation,
    NormalizedAudio, ResampleEngine, SampleRate,
};
pub use capabilities::Capabilities;
pub use orchestrator::{FallbackOrchestrator, SynthesisOutcome};
pub use tts::{
    ProviderAdapter, ProviderKind, ProviderReply, ResponseDispatcher, SynthesisRequest, TTSError,
    TTSResult, create_provider_adapter,
};
