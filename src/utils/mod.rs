//! Utils Module - Constants & Shared Helpers

pub mod constants;

pub use constants::*;
