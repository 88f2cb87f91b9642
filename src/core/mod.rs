//! Core Module - Classification Pipeline
//!
//! Feature extraction, reputation gate, model wrapper, decision policy,
//! and the batch orchestrator. Everything here is deterministic: the same
//! URL and artifact always produce the same verdict.

pub mod classifier;
pub mod decision;
pub mod engine;
pub mod features;
pub mod reputation;

pub use classifier::*;
pub use decision::*;
pub use engine::*;
pub use features::*;
pub use reputation::*;
