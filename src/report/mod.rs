//! Reporting utilities: currency formatting and terminal summaries.
//!
//! We keep formatting code in one place so:
//! - the encoding/model code stays free of presentation concerns
//! - the CLI and the TUI print results identically

pub mod format;

pub use format::*;
