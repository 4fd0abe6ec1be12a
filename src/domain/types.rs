//! Shared domain types.
//!
//! `RawAttributes` is what a person fills in; `EncodedVector` is what the model
//! consumes. The only bridge between the two is `encode::Encoder`, so the
//! positional layout below is defined once and nowhere else.

use chrono::{DateTime, Local};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Number of features the model expects.
pub const FEATURE_COUNT: usize = 9;

/// Positional field order of the model input.
///
/// This order is a contract with the trained model and must never be permuted.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "item_weight",
    "item_fat_content",
    "item_visibility",
    "item_type_code",
    "item_mrp",
    "outlet_establishment_year",
    "outlet_size",
    "outlet_location_type",
    "outlet_type",
];

/// Raw product and outlet attributes as entered in the form.
///
/// Categorical fields keep their human-readable label; mapping them to codes is
/// the encoder's job, and an unmapped label is an encoding error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAttributes {
    pub item_weight: f64,
    pub item_fat_content: String,
    pub item_visibility: f64,
    /// Already encoded upstream (0..=15); passed through as a number.
    pub item_type_code: i64,
    pub item_mrp: f64,
    pub outlet_establishment_year: i64,
    pub outlet_size: String,
    pub outlet_location_type: String,
    pub outlet_type: String,
}

impl Default for RawAttributes {
    /// Initial values of the interactive form.
    fn default() -> Self {
        Self {
            item_weight: 12.5,
            item_fat_content: "Low Fat".to_string(),
            item_visibility: 0.05,
            item_type_code: 4,
            item_mrp: 100.0,
            outlet_establishment_year: 1999,
            outlet_size: "Small".to_string(),
            outlet_location_type: "Tier 1".to_string(),
            outlet_type: "Supermarket Type1".to_string(),
        }
    }
}

impl RawAttributes {
    /// The fixed example offered next to the free-form input.
    pub fn reference_example() -> Self {
        Self {
            item_weight: 13.5,
            item_fat_content: "Low Fat".to_string(),
            item_visibility: 0.065,
            item_type_code: 4,
            item_mrp: 245.25,
            outlet_establishment_year: 1999,
            outlet_size: "Medium".to_string(),
            outlet_location_type: "Tier 2".to_string(),
            outlet_type: "Supermarket Type1".to_string(),
        }
    }
}

/// Documented domain of a numeric input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureDomain {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
    /// Whether the value must be a whole number.
    pub integral: bool,
}

impl FeatureDomain {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the domain (used by the form's stepper keys).
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

pub const ITEM_WEIGHT: FeatureDomain = FeatureDomain {
    field: "item_weight",
    min: 0.0,
    max: 50.0,
    integral: false,
};

pub const ITEM_VISIBILITY: FeatureDomain = FeatureDomain {
    field: "item_visibility",
    min: 0.0,
    max: 1.0,
    integral: false,
};

pub const ITEM_TYPE_CODE: FeatureDomain = FeatureDomain {
    field: "item_type_code",
    min: 0.0,
    max: 15.0,
    integral: true,
};

pub const ITEM_MRP: FeatureDomain = FeatureDomain {
    field: "item_mrp",
    min: 0.0,
    max: 400.0,
    integral: false,
};

pub const ESTABLISHMENT_YEAR: FeatureDomain = FeatureDomain {
    field: "outlet_establishment_year",
    min: 1985.0,
    max: 2022.0,
    integral: true,
};

/// Ordered, fixed-length model input.
///
/// The length is part of the type, so a vector of the wrong size cannot reach
/// a predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedVector([f64; FEATURE_COUNT]);

impl EncodedVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Value at a zero-based position.
    pub fn get(&self, position: usize) -> Option<f64> {
        self.0.get(position).copied()
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn to_dvector(&self) -> DVector<f64> {
        DVector::from_row_slice(&self.0)
    }

    /// Named view, mostly for display and exports.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

/// One completed prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub raw: RawAttributes,
    /// Encoder output.
    pub encoded: EncodedVector,
    /// What the model actually saw (differs from `encoded` only when scaling is applied).
    pub model_input: EncodedVector,
    pub value: f64,
    pub at: DateTime<Local>,
}

/// Result of one row in a batch run; failures keep their user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub line: usize,
    pub raw: RawAttributes,
    pub result: Result<Prediction, String>,
}
