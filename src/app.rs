//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - configures logging
//! - opens the prediction session (model + scaler), once
//! - dispatches to the requested front-end

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{BatchArgs, Cli, Command, PredictArgs};
use crate::config::Settings;
use crate::domain::RawAttributes;
use crate::error::{AppError, EXIT_INPUT};

pub mod pipeline;

pub use pipeline::Session;

/// Entry point for the `bigmart` binary.
pub fn run() -> Result<(), AppError> {
    let dotenv = crate::config::load_dotenv();

    // `bigmart` and `bigmart --model rf.json` behave like `bigmart tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    let settings = Settings::from(&cli.global);

    let interactive = matches!(cli.command, Command::Tui);
    init_tracing(&settings, interactive)?;
    if let Some(path) = dotenv {
        debug!(path = %path.display(), "loaded .env");
    }

    // Tables need no model; everything else fails here if the model is unavailable.
    if let Command::Tables = cli.command {
        print!("{}", crate::report::format_lookup_tables());
        return Ok(());
    }

    let session = Session::open(&settings)?;

    match cli.command {
        Command::Predict(args) => handle_predict(&session, &args),
        Command::Example => handle_example(&session),
        Command::Batch(args) => handle_batch(&session, &args),
        Command::Tui => crate::tui::run(session),
        Command::Tables => Ok(()),
    }
}

fn handle_predict(session: &Session, args: &PredictArgs) -> Result<(), AppError> {
    let prediction = session.predict(&args.to_raw())?;
    if args.show_vector {
        print!("{}", crate::report::format_vector(&prediction.encoded));
    }
    println!("{}", crate::report::format_prediction(&prediction));
    Ok(())
}

fn handle_example(session: &Session) -> Result<(), AppError> {
    let example = RawAttributes::reference_example();
    println!("{}", crate::report::format_example_input(&example));
    let prediction = session.predict(&example)?;
    println!("{}", crate::report::format_prediction(&prediction));
    Ok(())
}

fn handle_batch(session: &Session, args: &BatchArgs) -> Result<(), AppError> {
    let input = crate::io::read_batch_csv(&args.input)?;
    info!(
        path = %args.input.display(),
        rows = input.rows.len(),
        skipped = input.row_errors.len(),
        "running batch"
    );

    let outcomes = session.predict_batch(&input.rows);
    print!(
        "{}",
        crate::report::format_batch_summary(&outcomes, &input.row_errors)
    );

    if let Some(path) = &args.output {
        crate::io::write_predictions_csv(path, &outcomes)?;
        info!(path = %path.display(), "wrote batch results");
    }
    Ok(())
}

/// Configure the global tracing subscriber.
///
/// CLI commands log to stderr. The TUI owns the terminal, so it only logs when
/// a log file is configured.
fn init_tracing(settings: &Settings, interactive: bool) -> Result<(), AppError> {
    let default_level = if settings.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match (&settings.log_file, interactive) {
        (Some(path), _) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        (None, true) => {}
        (None, false) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .without_time()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File, AppError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            AppError::new(
                EXIT_INPUT,
                format!("Failed to open log file '{}': {e}", path.display()),
            )
        })
}

/// Rewrite argv so `bigmart` defaults to `bigmart tui`.
///
/// Rules:
/// - `bigmart`                        -> `bigmart tui`
/// - `bigmart --model rf.json`        -> `bigmart --model rf.json tui`
/// - `bigmart --help/--version/-h/-V` -> unchanged
/// - any positional token             -> unchanged (clap resolves the subcommand)
///
/// Values of value-taking global flags are not positionals, so
/// `bigmart --model example` still opens the TUI.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    const VALUE_FLAGS: [&str; 4] = ["--model", "--scaler", "--scaling", "--log-file"];

    let rest = argv.get(1..).unwrap_or_default();
    let mut has_positional = false;
    let mut tokens = rest.iter();
    while let Some(token) = tokens.next() {
        match token.as_str() {
            "-h" | "--help" | "-V" | "--version" => return argv,
            flag if VALUE_FLAGS.contains(&flag) => {
                tokens.next();
            }
            flag if flag.starts_with('-') => {}
            _ => {
                has_positional = true;
                break;
            }
        }
    }

    if !has_positional {
        argv.push("tui".to_string());
    }
    argv
}
