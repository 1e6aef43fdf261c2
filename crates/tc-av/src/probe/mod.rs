//! Probe backends.
//!
//! The pipeline only depends on the [`Prober`] trait; [`FfprobeProber`]
//! is the production implementation.

pub mod ffprobe;

use std::path::Path;

use async_trait::async_trait;
use tc_core::{ProbeReport, Result};

pub use self::ffprobe::FfprobeProber;

/// A media file prober capable of extracting duration, bitrate, and tags.
///
/// Implementations must be safe to share across threads (`Send + Sync`).
#[async_trait]
pub trait Prober: Send + Sync {
    /// Human-readable name identifying this prober implementation.
    fn name(&self) -> &'static str;

    /// Probe the audio file at `path`.
    ///
    /// A missing duration is not an error (the report carries zero); a
    /// failing tool or unreadable output is.
    async fn probe(&self, path: &Path) -> Result<ProbeReport>;
}
