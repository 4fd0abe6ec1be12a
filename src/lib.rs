//! `bigmart-sales` library crate.
//!
//! The binary (`bigmart`) is a thin wrapper around this library so that:
//!
//! - the encoding contract is testable without spawning processes
//! - the encoder and predictors can be reused by other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod encode;
pub mod error;
pub mod io;
pub mod models;
pub mod report;
pub mod tui;
