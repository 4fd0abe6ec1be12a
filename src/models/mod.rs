//! Predictor implementations.
//!
//! Models are loaded once, validated, and then only read. Everything that needs
//! a prediction goes through the `Predictor` trait, which keeps front-ends and
//! tests independent of the concrete estimator.

pub mod model;
pub mod scaler;

pub use model::*;
pub use scaler::*;
