//! tomecat - merge audio files into a single chaptered audiobook.
//!
//! This library crate exposes the pipeline stages for the binary and for
//! integration testing.

pub mod aggregate;
pub mod collector;
pub mod config;
pub mod output;
pub mod pipeline;
