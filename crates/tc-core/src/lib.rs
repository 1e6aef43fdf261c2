//! tc-core: shared types, errors, configuration, and ordering helpers.
//!
//! This crate is the foundational dependency for the other tomecat crates,
//! providing the error taxonomy, the immutable run configuration, the media
//! data model (file descriptors, tags, chapters, output metadata), and the
//! natural-sort key used to order input files.

pub mod config;
pub mod error;
pub mod media;
pub mod natural;
pub mod paths;

// Re-export the most commonly used items at the crate root.
pub use config::Config;
pub use error::{Error, Result};
pub use media::*;
