//! Read model and scaler artifacts.
//!
//! Both files are JSON documents whose schemas live in `domain::artifact`.
//! Every failure here is a `ModelError`: the session cannot start without a
//! usable model.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::{ModelArtifact, ScalerArtifact};
use crate::error::ModelError;
use crate::models::{FeatureScaler, LoadedModel, Predictor};

/// Load and validate a model artifact.
pub fn load_model(path: &Path) -> Result<LoadedModel, ModelError> {
    let artifact: ModelArtifact = read_json(path)?;
    let model = LoadedModel::from_artifact(&artifact)?;
    info!(path = %path.display(), model = %model.describe(), "loaded model");
    Ok(model)
}

/// Load and validate a scaler artifact.
pub fn load_scaler(path: &Path) -> Result<FeatureScaler, ModelError> {
    let artifact: ScalerArtifact = read_json(path)?;
    let scaler = FeatureScaler::from_artifact(&artifact)?;
    info!(path = %path.display(), "loaded feature scaler");
    Ok(scaler)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let file = File::open(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EncodedVector, FEATURE_COUNT};
    use std::io::Write;

    /// Write a model fixture.
    fn write_model(path: &Path, artifact: &ModelArtifact) {
        let file = File::create(path).unwrap();
        serde_json::to_writer_pretty(file, artifact).unwrap();
    }

    #[test]
    fn write_then_load_linear_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let artifact = ModelArtifact::Linear {
            name: Some("ols".to_string()),
            intercept: 1.0,
            coefficients: vec![1.0; FEATURE_COUNT],
        };
        write_model(&path, &artifact);

        let model = load_model(&path).unwrap();
        let v = EncodedVector::new([1.0; FEATURE_COUNT]);
        assert_eq!(model.predict(&v), 10.0);
    }

    #[test]
    fn missing_model_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().starts_with("model unavailable"));
    }

    #[test]
    fn pickle_bytes_are_not_a_model() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x80\x04\x95binary-pickle").unwrap();
        let err = load_model(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Parse { .. }));
    }

    #[test]
    fn scaler_with_wrong_width_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mean":[0,0],"scale":[1,1]}}"#).unwrap();
        let err = load_scaler(file.path()).unwrap_err();
        assert!(matches!(err, ModelError::Invalid(_)));
    }
}
