//! # tc-av
//!
//! External tool orchestration for tomecat.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- locate ffmpeg, ffprobe and
//!   docker, and decide whether a tool runs locally or inside the sandbox
//!   image.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support, plus a monitored mode that streams stderr into a
//!   [`ProgressMonitor`].
//! - **Probing** ([`probe::FfprobeProber`]) -- implements [`Prober`] by
//!   shelling out to ffprobe.
//! - **Mount context** ([`MountContext`]) -- common ancestor directory and
//!   scoped temp files for one encode.
//! - **Encoding** ([`actions::EncodePlan`]) -- the ffmpeg concat invocation.

pub mod actions;
pub mod command;
pub mod ffmetadata;
pub mod probe;
pub mod progress;
pub mod tools;
pub mod workspace;

// ---- Re-exports for convenience ----

pub use actions::EncodePlan;
pub use command::{ToolCommand, ToolOutput};
pub use probe::{FfprobeProber, Prober};
pub use progress::{ProgressHandle, ProgressMonitor};
pub use tools::{Tool, ToolRegistry};
pub use workspace::MountContext;
