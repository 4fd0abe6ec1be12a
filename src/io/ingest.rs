//! Batch CSV ingest.
//!
//! Turns a CSV of raw attributes into `RawAttributes` records for batch
//! prediction.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip unparseable rows, but report them)
//! - **No encoding here**: category labels are checked by the encoder so a
//!   batch reports the same errors as the form

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, warn};

use crate::domain::{FEATURE_NAMES, RawAttributes};
use crate::error::{AppError, EXIT_INPUT};

/// A parsed input row with its 1-based CSV line number.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub line: usize,
    pub raw: RawAttributes,
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed rows + rows that could not be parsed.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub rows: Vec<BatchRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Read a batch CSV file.
pub fn read_batch_csv(path: &Path) -> Result<BatchInput, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open CSV '{}': {e}", path.display()),
        )
    })?;
    read_batch(file)
}

/// Read batch rows from any reader (file, stdin, in-memory).
pub fn read_batch<R: std::io::Read>(source: R) -> Result<BatchInput, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let missing: Vec<&str> = FEATURE_NAMES
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::new(
            EXIT_INPUT,
            format!("CSV is missing required column(s): {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(raw) => rows.push(BatchRow { line, raw }),
            Err(message) => {
                warn!(line, %message, "skipping batch row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    if rows.is_empty() {
        return Err(AppError::new(EXIT_INPUT, "No usable rows in batch CSV."));
    }

    debug!(rows_read, rows = rows.len(), skipped = row_errors.len(), "batch ingested");
    Ok(BatchInput {
        rows,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

/// `"Item Weight"`, `"item_weight"` and `"ITEM-WEIGHT"` all name the same column.
fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<RawAttributes, String> {
    Ok(RawAttributes {
        item_weight: float_field(record, header_map, "item_weight")?,
        item_fat_content: text_field(record, header_map, "item_fat_content")?.to_string(),
        item_visibility: float_field(record, header_map, "item_visibility")?,
        item_type_code: int_field(record, header_map, "item_type_code")?,
        item_mrp: float_field(record, header_map, "item_mrp")?,
        outlet_establishment_year: int_field(record, header_map, "outlet_establishment_year")?,
        outlet_size: text_field(record, header_map, "outlet_size")?.to_string(),
        outlet_location_type: text_field(record, header_map, "outlet_location_type")?.to_string(),
        outlet_type: text_field(record, header_map, "outlet_type")?.to_string(),
    })
}

fn text_field<'r>(
    record: &'r StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'r str, String> {
    match header_map.get(name).and_then(|&idx| record.get(idx)) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("{name}: missing value")),
    }
}

fn float_field(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<f64, String> {
    let v = text_field(record, header_map, name)?;
    v.parse::<f64>()
        .map_err(|_| format!("{name}: '{v}' is not a number"))
}

fn int_field(record: &StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<i64, String> {
    let v = text_field(record, header_map, name)?;
    parse_whole_number(v).ok_or_else(|| format!("{name}: '{v}' is not a whole number"))
}

/// Accept `4` and `4.0` (spreadsheets like to add the decimal), reject `4.5`.
fn parse_whole_number(v: &str) -> Option<i64> {
    if let Ok(n) = v.parse::<i64>() {
        return Some(n);
    }
    let f = v.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
