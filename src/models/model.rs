//! Model evaluation for the supported estimator kinds.
//!
//! Two primitive operations matter here:
//! - validate an artifact into an in-memory model (once, at startup)
//! - map an `EncodedVector` to a sales estimate (per request)

use nalgebra::DVector;

use crate::domain::{EncodedVector, FEATURE_COUNT, ModelArtifact, TreeArtifact};
use crate::error::ModelError;

/// Anything that turns an encoded feature vector into a sales estimate.
///
/// Implementations hold no per-call mutable state, so one instance can serve
/// any number of concurrent sessions.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &EncodedVector) -> f64;

    /// Short human-readable description for logs and headers.
    fn describe(&self) -> String;
}

/// Ordinary linear regression.
#[derive(Debug, Clone)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: DVector<f64>,
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: &[f64]) -> Result<Self, ModelError> {
        if coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "expected {FEATURE_COUNT} coefficients, got {}",
                coefficients.len()
            )));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid(
                "linear model has non-finite parameters".to_string(),
            ));
        }
        Ok(Self {
            intercept,
            coefficients: DVector::from_row_slice(coefficients),
        })
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &EncodedVector) -> f64 {
        self.intercept + self.coefficients.dot(&features.to_dvector())
    }

    fn describe(&self) -> String {
        format!("linear regression ({FEATURE_COUNT} features)")
    }
}

/// A validated regression tree.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy)]
enum TreeNode {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

impl RegressionTree {
    /// Validate the node arrays of one tree.
    ///
    /// Children must point strictly forward, which rules out cycles and
    /// guarantees the walk in `predict` terminates.
    pub fn from_artifact(tree: &TreeArtifact) -> Result<Self, ModelError> {
        let n = tree.value.len();
        if n == 0 {
            return Err(ModelError::Invalid("tree has no nodes".to_string()));
        }
        if [tree.feature.len(), tree.threshold.len(), tree.left.len(), tree.right.len()]
            .iter()
            .any(|&len| len != n)
        {
            return Err(ModelError::Invalid(
                "tree node arrays have mismatched lengths".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (tree.left[i], tree.right[i]);
            if left == -1 && right == -1 {
                if !tree.value[i].is_finite() {
                    return Err(ModelError::Invalid(format!("leaf {i} has a non-finite value")));
                }
                nodes.push(TreeNode::Leaf(tree.value[i]));
                continue;
            }

            let child = |c: i64| -> Result<usize, ModelError> {
                usize::try_from(c)
                    .ok()
                    .filter(|&c| c > i && c < n)
                    .ok_or_else(|| ModelError::Invalid(format!("node {i} has invalid child {c}")))
            };
            let feature = usize::try_from(tree.feature[i])
                .ok()
                .filter(|&f| f < FEATURE_COUNT)
                .ok_or_else(|| {
                    ModelError::Invalid(format!("node {i} splits on unknown feature {}", tree.feature[i]))
                })?;
            if !tree.threshold[i].is_finite() {
                return Err(ModelError::Invalid(format!("node {i} has a non-finite threshold")));
            }

            nodes.push(TreeNode::Split {
                feature,
                threshold: tree.threshold[i],
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf(value) => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Averaging tree ensemble (random forest style).
#[derive(Debug, Clone)]
pub struct ForestModel {
    trees: Vec<RegressionTree>,
}

impl ForestModel {
    pub fn from_artifacts(trees: &[TreeArtifact]) -> Result<Self, ModelError> {
        if trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".to_string()));
        }
        let trees = trees
            .iter()
            .map(RegressionTree::from_artifact)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { trees })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl Predictor for ForestModel {
    fn predict(&self, features: &EncodedVector) -> f64 {
        let x = features.as_slice();
        let sum: f64 = self.trees.iter().map(|t| t.predict(x)).sum();
        sum / self.trees.len() as f64
    }

    fn describe(&self) -> String {
        format!("tree ensemble ({} trees)", self.trees.len())
    }
}

/// A model built from an artifact, with its optional display name.
pub struct LoadedModel {
    pub name: Option<String>,
    pub predictor: Box<dyn Predictor>,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("name", &self.name)
            .field("predictor", &self.predictor.describe())
            .finish()
    }
}

impl LoadedModel {
    pub fn from_artifact(artifact: &ModelArtifact) -> Result<Self, ModelError> {
        match artifact {
            ModelArtifact::Linear {
                name,
                intercept,
                coefficients,
            } => Ok(Self {
                name: name.clone(),
                predictor: Box::new(LinearModel::new(*intercept, coefficients)?),
            }),
            ModelArtifact::Forest { name, trees } => Ok(Self {
                name: name.clone(),
                predictor: Box::new(ForestModel::from_artifacts(trees)?),
            }),
        }
    }
}

impl Predictor for LoadedModel {
    fn predict(&self, features: &EncodedVector) -> f64 {
        self.predictor.predict(features)
    }

    fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("{name}: {}", self.predictor.describe()),
            None => self.predictor.describe(),
        }
    }
}
