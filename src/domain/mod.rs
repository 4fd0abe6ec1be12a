//! Domain types used throughout the prediction pipeline.
//!
//! This module defines:
//!
//! - the raw form record (`RawAttributes`)
//! - the positional model input (`EncodedVector`) and its field order
//! - the documented numeric domains (`FeatureDomain`)
//! - the on-disk model and scaler schemas (`ModelArtifact`, `ScalerArtifact`)

pub mod artifact;
pub mod types;

pub use artifact::*;
pub use types::*;
