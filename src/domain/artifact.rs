//! On-disk model and scaler schemas (JSON).
//!
//! These replace the opaque pickled estimator files: the training side exports
//! parameters once, and this crate only ever reads them.

use serde::{Deserialize, Serialize};

/// A trained regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ModelArtifact {
    /// `y = intercept + Σ coefficients[i] * x[i]`
    Linear {
        #[serde(default)]
        name: Option<String>,
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Mean of regression trees.
    Forest {
        #[serde(default)]
        name: Option<String>,
        trees: Vec<TreeArtifact>,
    },
}

/// One regression tree stored as parallel node arrays.
///
/// Node `i` is a leaf when `left[i] == right[i] == -1`; otherwise the walk
/// goes to `left[i]` when `x[feature[i]] <= threshold[i]`, else `right[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub left: Vec<i64>,
    pub right: Vec<i64>,
    pub value: Vec<f64>,
}

/// Standard-scaling parameters: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_artifact_parses_with_kind_tag() {
        let json = r#"{"kind":"linear","intercept":1.5,"coefficients":[1,2,3,4,5,6,7,8,9]}"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        match artifact {
            ModelArtifact::Linear { name, intercept, coefficients } => {
                assert!(name.is_none());
                assert_eq!(intercept, 1.5);
                assert_eq!(coefficients.len(), 9);
            }
            other => panic!("unexpected artifact: {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = r#"{"kind":"xgboost","booster":"gbtree"}"#;
        assert!(serde_json::from_str::<ModelArtifact>(json).is_err());
    }
}
