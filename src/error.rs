//! Error types.
//!
//! Module-level failures are typed (`EncodeError`, `ModelError`,
//! `PredictError`) so callers can tell a bad form field from a missing model.
//! At the process boundary everything collapses into `AppError`, which carries
//! the message shown to the user and the exit code used by `bigmart`.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for usage, input, file and terminal I/O problems.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for attribute encoding failures.
pub const EXIT_ENCODE: u8 = 3;
/// Exit code for model loading and prediction failures.
pub const EXIT_MODEL: u8 = 4;

/// Failure to turn raw attributes into a feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// A categorical label has no entry in its lookup table.
    #[error("{field}: unknown category '{value}' (expected one of: {})", .allowed.join(", "))]
    UnknownCategory {
        field: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// A numeric field falls outside its documented domain.
    #[error("{field}: {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A numeric field is NaN/infinite, or fractional where an integer is required.
    #[error("{field}: {reason}")]
    InvalidNumber { field: &'static str, reason: String },
}

impl EncodeError {
    /// Name of the form field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            EncodeError::UnknownCategory { field, .. }
            | EncodeError::OutOfRange { field, .. }
            | EncodeError::InvalidNumber { field, .. } => field,
        }
    }
}

/// The model (or the scaler it depends on) could not be made available.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model unavailable: '{}' is not a valid artifact: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model unavailable: {0}")]
    Invalid(String),
}

/// A loaded model produced an unusable value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("model returned a non-finite prediction ({0})")]
    NonFinite(f64),
}

/// Process-boundary error: a user-facing message plus an exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<EncodeError> for AppError {
    fn from(err: EncodeError) -> Self {
        AppError::new(EXIT_ENCODE, err.to_string())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::new(EXIT_MODEL, err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        AppError::new(EXIT_MODEL, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_category_message_lists_allowed_labels() {
        let err = EncodeError::UnknownCategory {
            field: "outlet_size",
            value: "Ultra Size".to_string(),
            allowed: vec!["Small", "Medium", "High"],
        };
        assert_eq!(
            err.to_string(),
            "outlet_size: unknown category 'Ultra Size' (expected one of: Small, Medium, High)"
        );
        assert_eq!(err.field(), "outlet_size");
    }

    #[test]
    fn errors_map_to_exit_codes() {
        let enc: AppError = EncodeError::InvalidNumber {
            field: "item_mrp",
            reason: "must be finite".to_string(),
        }
        .into();
        assert_eq!(enc.exit_code(), EXIT_ENCODE);

        let model: AppError = ModelError::Invalid("expected 9 coefficients, got 3".to_string()).into();
        assert_eq!(model.exit_code(), EXIT_MODEL);
        assert!(model.message().starts_with("model unavailable"));
    }
}
