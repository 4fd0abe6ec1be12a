//! Command-line parsing for the sales predictor.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! encoding, model loading, and presentation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{DEFAULT_MODEL_PATH, ENV_LOG_FILE, ENV_MODEL_PATH, ENV_SCALER_PATH, ENV_SCALING};
use crate::domain::RawAttributes;
use crate::models::ScalingPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bigmart", version, about = "BigMart sales predictor")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Trained model artifact (JSON).
    #[arg(long, global = true, env = ENV_MODEL_PATH, default_value = DEFAULT_MODEL_PATH)]
    pub model: PathBuf,

    /// Feature scaler artifact (JSON).
    #[arg(long, global = true, env = ENV_SCALER_PATH)]
    pub scaler: Option<PathBuf>,

    /// Whether a loaded scaler is applied before prediction.
    #[arg(long, global = true, value_enum, env = ENV_SCALING, default_value_t = ScalingPolicy::Ignore)]
    pub scaling: ScalingPolicy,

    /// Accept numeric inputs outside their documented ranges.
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file (the TUI is silent otherwise).
    #[arg(long, global = true, env = ENV_LOG_FILE)]
    pub log_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict sales for attributes given as flags.
    Predict(PredictArgs),
    /// Predict the built-in example product.
    Example,
    /// Predict every row of a CSV file.
    Batch(BatchArgs),
    /// Print the categorical lookup tables.
    Tables,
    /// Launch the interactive form.
    Tui,
}

/// Raw attributes for a single prediction. Defaults match the form.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    /// Item weight (0-50).
    #[arg(long, default_value_t = 12.5, allow_negative_numbers = true)]
    pub item_weight: f64,

    /// Item fat content (Low Fat, Regular).
    #[arg(long, default_value = "Low Fat")]
    pub item_fat_content: String,

    /// Item visibility (0-1).
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    pub item_visibility: f64,

    /// Item type, already encoded (0-15).
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    pub item_type_code: i64,

    /// Item MRP (0-400).
    #[arg(long, default_value_t = 100.0, allow_negative_numbers = true)]
    pub item_mrp: f64,

    /// Outlet establishment year (1985-2022).
    #[arg(long, default_value_t = 1999, allow_negative_numbers = true)]
    pub outlet_establishment_year: i64,

    /// Outlet size (Small, Medium, High).
    #[arg(long, default_value = "Small")]
    pub outlet_size: String,

    /// Outlet location type (Tier 1, Tier 2, Tier 3).
    #[arg(long, default_value = "Tier 1")]
    pub outlet_location_type: String,

    /// Outlet type (Supermarket Type1/2/3, Grocery Store).
    #[arg(long, default_value = "Supermarket Type1")]
    pub outlet_type: String,

    /// Also print the encoded feature vector.
    #[arg(long)]
    pub show_vector: bool,
}

impl PredictArgs {
    pub fn to_raw(&self) -> RawAttributes {
        RawAttributes {
            item_weight: self.item_weight,
            item_fat_content: self.item_fat_content.clone(),
            item_visibility: self.item_visibility,
            item_type_code: self.item_type_code,
            item_mrp: self.item_mrp,
            outlet_establishment_year: self.outlet_establishment_year,
            outlet_size: self.outlet_size.clone(),
            outlet_location_type: self.outlet_location_type.clone(),
            outlet_type: self.outlet_type.clone(),
        }
    }
}

/// Options for batch prediction.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Input CSV with one column per raw attribute.
    #[arg(long, short = 'i', value_name = "CSV")]
    pub input: PathBuf,

    /// Write per-row results to this CSV.
    #[arg(long, short = 'o', value_name = "CSV")]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{Encoder, RangePolicy};
    use crate::error::EncodeError;

    #[test]
    fn predict_defaults_match_form_defaults() {
        let cli = Cli::try_parse_from(["bigmart", "predict"]).unwrap();
        match cli.command {
            Command::Predict(args) => assert_eq!(args.to_raw(), RawAttributes::default()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn predict_accepts_labels_with_spaces() {
        let cli = Cli::try_parse_from([
            "bigmart",
            "predict",
            "--outlet-size",
            "High",
            "--outlet-type",
            "Grocery Store",
            "--item-mrp",
            "245.25",
        ])
        .unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let raw = args.to_raw();
        assert_eq!(raw.outlet_size, "High");
        assert_eq!(raw.outlet_type, "Grocery Store");
        assert_eq!(raw.item_mrp, 245.25);
    }

    #[test]
    fn global_flags_may_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["bigmart", "example", "--model", "rf.json", "-v"]).unwrap();
        assert_eq!(cli.global.model, PathBuf::from("rf.json"));
        assert!(cli.global.verbose);
    }

    #[test]
    fn negative_numbers_reach_the_encoder() {
        let cli = Cli::try_parse_from([
            "bigmart",
            "--lenient",
            "predict",
            "--item-mrp",
            "-10",
            "--item-weight",
            "-1.5",
            "--item-visibility",
            "-0.2",
            "--outlet-establishment-year",
            "-5",
        ])
        .unwrap();
        assert!(cli.global.lenient);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let raw = args.to_raw();
        assert_eq!(raw.item_mrp, -10.0);
        assert_eq!(raw.item_weight, -1.5);
        assert_eq!(raw.item_visibility, -0.2);
        assert_eq!(raw.outlet_establishment_year, -5);

        let err = Encoder::default().encode(&raw).unwrap_err();
        assert!(matches!(err, EncodeError::OutOfRange { .. }));
        assert!(Encoder::new(RangePolicy::Lenient).encode(&raw).is_ok());
    }

    #[test]
    fn batch_requires_input() {
        assert!(Cli::try_parse_from(["bigmart", "batch"]).is_err());
    }
}
