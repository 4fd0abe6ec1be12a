//! Standard feature scaling.
//!
//! Whether the model was trained on scaled inputs is not recorded anywhere in
//! the artifacts, so applying the scaler is a runtime choice (`ScalingPolicy`).

use clap::ValueEnum;
use nalgebra::DVector;

use crate::domain::{EncodedVector, FEATURE_COUNT, ScalerArtifact};
use crate::error::ModelError;

/// Whether a loaded scaler is applied before prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScalingPolicy {
    /// Load and validate the scaler but feed unscaled features to the model.
    #[default]
    Ignore,
    /// Standard-scale features before prediction.
    Apply,
}

#[derive(Debug, Clone)]
pub struct FeatureScaler {
    mean: DVector<f64>,
    scale: DVector<f64>,
}

impl FeatureScaler {
    pub fn from_artifact(artifact: &ScalerArtifact) -> Result<Self, ModelError> {
        if artifact.mean.len() != FEATURE_COUNT || artifact.scale.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "scaler must have {FEATURE_COUNT} means and scales, got {} and {}",
                artifact.mean.len(),
                artifact.scale.len()
            )));
        }
        if artifact.mean.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::Invalid("scaler has non-finite means".to_string()));
        }
        if let Some(pos) = artifact.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(ModelError::Invalid(format!(
                "scaler has an unusable scale at position {pos}"
            )));
        }
        Ok(Self {
            mean: DVector::from_row_slice(&artifact.mean),
            scale: DVector::from_row_slice(&artifact.scale),
        })
    }

    pub fn transform(&self, features: &EncodedVector) -> EncodedVector {
        let scaled = (features.to_dvector() - &self.mean).component_div(&self.scale);
        let mut out = [0.0; FEATURE_COUNT];
        out.copy_from_slice(scaled.as_slice());
        EncodedVector::new(out)
    }
}
