//! Shared prediction pipeline used by the CLI, batch, and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! raw attributes -> encode -> (optional scaling) -> predict
//!
//! The front-ends then only deal with presentation (printing vs widgets).

use std::sync::Arc;

use chrono::Local;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::{BatchOutcome, Prediction, RawAttributes};
use crate::encode::Encoder;
use crate::error::{AppError, ModelError, PredictError};
use crate::io::ingest::BatchRow;
use crate::models::{FeatureScaler, Predictor, ScalingPolicy};

/// Everything needed to serve predictions, acquired once per process.
///
/// All members are read-only after construction, so a `Session` can be shared
/// by reference across threads without locking.
#[derive(Clone)]
pub struct Session {
    encoder: Encoder,
    predictor: Arc<dyn Predictor>,
    scaler: Option<FeatureScaler>,
    scaling: ScalingPolicy,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("encoder", &self.encoder)
            .field("predictor", &self.predictor.describe())
            .field("has_scaler", &self.scaler.is_some())
            .field("scaling", &self.scaling)
            .finish()
    }
}

impl Session {
    /// A session that feeds encoded vectors straight to `predictor`.
    pub fn new(encoder: Encoder, predictor: Arc<dyn Predictor>) -> Self {
        Self {
            encoder,
            predictor,
            scaler: None,
            scaling: ScalingPolicy::Ignore,
        }
    }

    pub fn with_scaler(mut self, scaler: FeatureScaler, scaling: ScalingPolicy) -> Self {
        self.scaler = Some(scaler);
        self.scaling = scaling;
        self
    }

    /// Load the model (and scaler, if configured) described by `settings`.
    ///
    /// Any failure here is reported once, before a front-end starts.
    pub fn open(settings: &Settings) -> Result<Self, AppError> {
        let model = crate::io::load_model(&settings.model_path)?;
        let mut session = Session::new(Encoder::new(settings.range_policy), Arc::new(model));

        match (&settings.scaler_path, settings.scaling) {
            (Some(path), scaling) => {
                let scaler = crate::io::load_scaler(path)?;
                if scaling == ScalingPolicy::Ignore {
                    warn!(
                        path = %path.display(),
                        "feature scaler loaded but not applied; pass --scaling apply if the model was trained on scaled features"
                    );
                }
                session = session.with_scaler(scaler, scaling);
            }
            (None, ScalingPolicy::Apply) => {
                return Err(ModelError::Invalid(
                    "--scaling apply requires a scaler (--scaler or BIGMART_SCALER_PATH)".to_string(),
                )
                .into());
            }
            (None, ScalingPolicy::Ignore) => {}
        }

        info!(session = ?session, "prediction session ready");
        Ok(session)
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn scaling(&self) -> ScalingPolicy {
        self.scaling
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    pub fn describe_model(&self) -> String {
        self.predictor.describe()
    }

    /// Encode `raw` and run the model on it.
    pub fn predict(&self, raw: &RawAttributes) -> Result<Prediction, AppError> {
        let encoded = self.encoder.encode(raw)?;
        let model_input = match (&self.scaler, self.scaling) {
            (Some(scaler), ScalingPolicy::Apply) => scaler.transform(&encoded),
            _ => encoded,
        };

        let value = self.predictor.predict(&model_input);
        if !value.is_finite() {
            return Err(PredictError::NonFinite(value).into());
        }
        debug!(value, "prediction");

        Ok(Prediction {
            raw: raw.clone(),
            encoded,
            model_input,
            value,
            at: Local::now(),
        })
    }

    /// Predict every row independently; failures are recorded per row.
    ///
    /// Output order matches input order.
    pub fn predict_batch(&self, rows: &[BatchRow]) -> Vec<BatchOutcome> {
        rows.par_iter()
            .map(|row| BatchOutcome {
                line: row.line,
                raw: row.raw.clone(),
                result: self.predict(&row.raw).map_err(|e| e.to_string()),
            })
            .collect()
    }
}
