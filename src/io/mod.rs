//! Input/output helpers.
//!
//! - model and scaler artifact loading (`artifact`)
//! - batch CSV ingest + validation (`ingest`)
//! - prediction exports (`export`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::*;
pub use export::*;
pub use ingest::*;
