//! Export batch predictions to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: raw inputs, the encoded features the model saw, then the result.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{BatchOutcome, FEATURE_NAMES};
use crate::error::{AppError, EXIT_INPUT};

/// Write batch outcomes to a CSV file.
pub fn write_predictions_csv(path: &Path, outcomes: &[BatchOutcome]) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to create export CSV '{}': {e}", path.display()),
        )
    })?;
    write_predictions(file, outcomes)
}

/// Write batch outcomes to any writer.
pub fn write_predictions<W: Write>(sink: W, outcomes: &[BatchOutcome]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    let write_err = |e: csv::Error| AppError::new(EXIT_INPUT, format!("Failed to write export CSV: {e}"));

    let mut header: Vec<String> = vec!["line".to_string()];
    header.extend(FEATURE_NAMES.iter().map(|n| n.to_string()));
    header.extend(FEATURE_NAMES.iter().map(|n| format!("enc_{n}")));
    header.extend(["predicted_sales", "predicted_at", "error"].map(String::from));
    writer.write_record(&header).map_err(write_err)?;

    for outcome in outcomes {
        let raw = &outcome.raw;
        let mut record = vec![
            outcome.line.to_string(),
            raw.item_weight.to_string(),
            raw.item_fat_content.clone(),
            raw.item_visibility.to_string(),
            raw.item_type_code.to_string(),
            raw.item_mrp.to_string(),
            raw.outlet_establishment_year.to_string(),
            raw.outlet_size.clone(),
            raw.outlet_location_type.clone(),
            raw.outlet_type.clone(),
        ];
        match &outcome.result {
            Ok(prediction) => {
                record.extend(prediction.encoded.as_slice().iter().map(|v| v.to_string()));
                record.push(format!("{:.4}", prediction.value));
                record.push(prediction.at.to_rfc3339());
                record.push(String::new());
            }
            Err(message) => {
                record.extend(std::iter::repeat_n(String::new(), FEATURE_NAMES.len() + 2));
                record.push(message.clone());
            }
        }
        writer.write_record(&record).map_err(write_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Prediction, RawAttributes};
    use crate::encode::encode;

    #[test]
    fn writes_success_and_failure_rows() {
        let raw = RawAttributes::reference_example();
        let encoded = encode(&raw).unwrap();
        let outcomes = vec![
            BatchOutcome {
                line: 2,
                raw: raw.clone(),
                result: Ok(Prediction {
                    raw: raw.clone(),
                    encoded,
                    model_input: encoded,
                    value: 3456.789,
                    at: chrono::Local::now(),
                }),
            },
            BatchOutcome {
                line: 3,
                raw: RawAttributes {
                    outlet_size: "Ultra Size".to_string(),
                    ..raw
                },
                result: Err("outlet_size: unknown category 'Ultra Size'".to_string()),
            },
        ];

        let mut buf = Vec::new();
        write_predictions(&mut buf, &outcomes).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("line,item_weight,"));
        assert!(lines[0].ends_with("predicted_sales,predicted_at,error"));
        assert!(lines[1].starts_with("2,13.5,Low Fat,0.065,4,245.25,1999,Medium,Tier 2,Supermarket Type1,13.5,0,0.065,4,245.25,1999,2,1,3,3456.7890,"));
        assert!(lines[2].ends_with(",outlet_size: unknown category 'Ultra Size'"));
        // Every row has the same number of columns.
        let cols = lines[0].split(',').count();
        assert_eq!(lines[2].split(',').count(), cols);
    }
}
