//! Categorical encoding.
//!
//! Static lookup tables map form labels to the integer codes the model was
//! trained on; the encoder assembles them with the numeric fields into the
//! fixed positional vector.

pub mod encoder;
pub mod tables;

pub use encoder::*;
pub use tables::*;
