//! Encoder actions.

mod concat;

pub use concat::EncodePlan;
