//! Runtime settings.
//!
//! Resolution order (later wins): built-in defaults, `.env`, process
//! environment, command-line flags. clap reads the environment itself (see the
//! `env = ...` attributes in `cli`), so this module only has to load `.env`
//! early and turn the parsed global flags into a `Settings` value.

use std::path::PathBuf;

use crate::cli::GlobalArgs;
use crate::encode::RangePolicy;
use crate::models::ScalingPolicy;

pub const ENV_MODEL_PATH: &str = "BIGMART_MODEL_PATH";
pub const ENV_SCALER_PATH: &str = "BIGMART_SCALER_PATH";
pub const ENV_SCALING: &str = "BIGMART_SCALING";
pub const ENV_LOG_FILE: &str = "BIGMART_LOG_FILE";

pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Load `.env` into the process environment; returns the file used, if any.
///
/// Runs before logging is configured, so the caller logs the result.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub scaler_path: Option<PathBuf>,
    pub scaling: ScalingPolicy,
    pub range_policy: RangePolicy,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler_path: None,
            scaling: ScalingPolicy::Ignore,
            range_policy: RangePolicy::Enforce,
            verbose: false,
            log_file: None,
        }
    }
}

impl From<&GlobalArgs> for Settings {
    fn from(args: &GlobalArgs) -> Self {
        Self {
            model_path: args.model.clone(),
            scaler_path: args.scaler.clone(),
            scaling: args.scaling,
            range_policy: if args.lenient {
                RangePolicy::Lenient
            } else {
                RangePolicy::Enforce
            },
            verbose: args.verbose,
            log_file: args.log_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn flags_become_settings() {
        let cli = Cli::try_parse_from([
            "bigmart",
            "--model",
            "m.json",
            "--scaler",
            "s.json",
            "--scaling",
            "apply",
            "--lenient",
            "tables",
        ])
        .unwrap();
        let settings = Settings::from(&cli.global);
        assert_eq!(settings.model_path, PathBuf::from("m.json"));
        assert_eq!(settings.scaler_path, Some(PathBuf::from("s.json")));
        assert_eq!(settings.scaling, ScalingPolicy::Apply);
        assert_eq!(settings.range_policy, RangePolicy::Lenient);
    }

    #[test]
    fn defaults_match_cli_defaults() {
        // Environment variables would leak into the parse; only compare the
        // fields they cannot reach.
        let cli = Cli::try_parse_from(["bigmart", "tables"]).unwrap();
        let settings = Settings::from(&cli.global);
        assert_eq!(settings.range_policy, Settings::default().range_policy);
        assert!(!settings.verbose);
    }
}
