//! Startup capability probe.
//!
//! Decides once which conversion tiers the process can run. The result is
//! immutable and shared by `Arc` for the lifetime of the server.

use serde::Serialize;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::audio::ConversionTier;

/// Whether the decode + resample backend was compiled in.
pub const FAST_RESAMPLE_COMPILED: bool = cfg!(feature = "fast-resample");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Tier 1 may be attempted
    pub fast_vectorized: bool,
    /// Requests are answered with a synthetic tone
    pub demo_mode: bool,
}

impl Capabilities {
    pub fn probe(config: &ServerConfig) -> Self {
        let capabilities = Self {
            fast_vectorized: FAST_RESAMPLE_COMPILED && config.fast_resample_enabled,
            demo_mode: config.demo_mode,
        };
        info!(
            fast_vectorized = capabilities.fast_vectorized,
            compiled = FAST_RESAMPLE_COMPILED,
            demo_mode = capabilities.demo_mode,
            "Probed conversion capabilities"
        );
        capabilities
    }

    /// Tiers in attempt order.
    pub fn available_tiers(&self) -> Vec<ConversionTier> {
        ConversionTier::ORDER
            .into_iter()
            .filter(|tier| *tier != ConversionTier::FastVectorized || self.fast_vectorized)
            .collect()
    }
}
