//! Providers Module - External Data Sources
//!
//! Acquisition of the model artifact and its metadata from remote storage.

pub mod artifact;

pub use artifact::*;
