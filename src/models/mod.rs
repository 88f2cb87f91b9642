//! Models Module - Data Structures & Errors
//!
//! Single source of truth for the error taxonomy and the data types shared
//! between the pipeline and the API layer.

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
