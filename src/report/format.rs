//! Text formatting for predictions, inputs, lookup tables, and batch runs.

use crate::domain::{BatchOutcome, EncodedVector, Prediction, RawAttributes};
use crate::encode::ALL_TABLES;
use crate::io::ingest::RowError;

/// Currency symbol used for sales figures.
pub const CURRENCY: &str = "₹";

/// Format a sales figure as `₹1,234,567.89`.
///
/// Negative values render as `-₹12.34`; values that round to zero never carry
/// a sign.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("{CURRENCY}{value}");
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{CURRENCY}{grouped}.{frac_part}")
}

/// `Predicted Sales: ₹…`, flagging negative estimates.
pub fn format_prediction(prediction: &Prediction) -> String {
    let mut out = format!("Predicted Sales: {}", format_currency(prediction.value));
    if prediction.value < 0.0 {
        out.push_str(" (negative estimate: model extrapolating)");
    }
    out
}

/// The input block shown next to the hardcoded example.
pub fn format_example_input(raw: &RawAttributes) -> String {
    let mut out = String::new();
    out.push_str("Hardcoded Input:\n");
    for (label, value) in input_lines(raw) {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out
}

/// Human labels and display values for each raw field, in feature order.
pub fn input_lines(raw: &RawAttributes) -> [(&'static str, String); 9] {
    [
        ("Item Weight", raw.item_weight.to_string()),
        ("Item Fat Content", raw.item_fat_content.clone()),
        ("Item Visibility", raw.item_visibility.to_string()),
        ("Item Type (encoded)", raw.item_type_code.to_string()),
        ("Item MRP", raw.item_mrp.to_string()),
        ("Establishment Year", raw.outlet_establishment_year.to_string()),
        ("Outlet Size", raw.outlet_size.clone()),
        ("Outlet Location Type", raw.outlet_location_type.clone()),
        ("Outlet Type", raw.outlet_type.clone()),
    ]
}

/// `name = value` lines for an encoded vector.
pub fn format_vector(vector: &EncodedVector) -> String {
    let mut out = String::from("Encoded features:\n");
    for (i, (name, value)) in vector.named().enumerate() {
        out.push_str(&format!("  [{}] {:<26} {}\n", i + 1, name, value));
    }
    out
}

/// All categorical lookup tables.
pub fn format_lookup_tables() -> String {
    let mut out = String::new();
    for table in ALL_TABLES {
        out.push_str(&format!("{}:\n", table.field));
        for &(label, code) in table.entries() {
            out.push_str(&format!("  {label:<20} -> {code}\n"));
        }
    }
    out
}

/// Summary of a batch run: counts, total, and every failure with its line.
pub fn format_batch_summary(outcomes: &[BatchOutcome], row_errors: &[RowError]) -> String {
    let ok: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok().map(|p| p.value))
        .collect();
    let failed = outcomes.len() - ok.len();

    let mut out = String::new();
    out.push_str("=== bigmart - batch prediction ===\n");
    out.push_str(&format!(
        "Rows: predicted={} | failed={} | unparseable={}\n",
        ok.len(),
        failed,
        row_errors.len()
    ));

    if !ok.is_empty() {
        let total: f64 = ok.iter().sum();
        let (min, max) = ok
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        out.push_str(&format!(
            "Sales: total={} | mean={} | min={} | max={}\n",
            format_currency(total),
            format_currency(total / ok.len() as f64),
            format_currency(min),
            format_currency(max),
        ));
    }

    let mut problems: Vec<(usize, &str)> = row_errors
        .iter()
        .map(|e| (e.line, e.message.as_str()))
        .chain(
            outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().err().map(|m| (o.line, m.as_str()))),
        )
        .collect();
    problems.sort_by_key(|&(line, _)| line);
    if !problems.is_empty() {
        out.push_str("\nProblems:\n");
        for (line, message) in problems {
            out.push_str(&format!("  line {line}: {message}\n"));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode;

    fn prediction(value: f64) -> Prediction {
        let raw = RawAttributes::reference_example();
        let encoded = encode(&raw).unwrap();
        Prediction {
            raw,
            encoded,
            model_input: encoded,
            value,
            at: chrono::Local::now(),
        }
    }

    #[test]
    fn currency_groups_thousands_with_two_decimals() {
        assert_eq!(format_currency(0.0), "₹0.00");
        assert_eq!(format_currency(999.994), "₹999.99");
        assert_eq!(format_currency(1000.0), "₹1,000.00");
        assert_eq!(format_currency(100.0), "₹100.00");
        assert_eq!(format_currency(1234.5), "₹1,234.50");
        assert_eq!(format_currency(1234567.891), "₹1,234,567.89");
        assert_eq!(format_currency(-42.1), "-₹42.10");
        assert_eq!(format_currency(-0.001), "₹0.00");
    }

    #[test]
    fn negative_predictions_are_flagged() {
        assert_eq!(format_prediction(&prediction(3821.456)), "Predicted Sales: ₹3,821.46");
        assert!(format_prediction(&prediction(-10.0)).ends_with("(negative estimate: model extrapolating)"));
    }

    #[test]
    fn example_block_lists_all_fields() {
        let text = format_example_input(&RawAttributes::reference_example());
        assert!(text.starts_with("Hardcoded Input:\n"));
        assert!(text.contains("Item Weight: 13.5\n"));
        assert!(text.contains("Item Visibility: 0.065\n"));
        assert!(text.contains("Outlet Type: Supermarket Type1\n"));
        assert_eq!(text.lines().count(), 10);
    }

    #[test]
    fn lookup_tables_show_every_code() {
        let text = format_lookup_tables();
        assert!(text.contains("outlet_size:\n"));
        assert!(text.contains("High"));
        assert_eq!(text.matches("->").count(), 2 + 3 + 3 + 4);
    }

    #[test]
    fn batch_summary_merges_problems_by_line() {
        let raw = RawAttributes::reference_example();
        let outcomes = vec![
            BatchOutcome { line: 2, raw: raw.clone(), result: Ok(prediction(1000.0)) },
            BatchOutcome { line: 4, raw: raw.clone(), result: Err("outlet_size: unknown category".to_string()) },
            BatchOutcome { line: 5, raw, result: Ok(prediction(3000.0)) },
        ];
        let row_errors = vec![RowError { line: 3, message: "item_mrp: 'x' is not a number".to_string() }];

        let text = format_batch_summary(&outcomes, &row_errors);
        assert!(text.contains("Rows: predicted=2 | failed=1 | unparseable=1"));
        assert!(text.contains("total=₹4,000.00 | mean=₹2,000.00 | min=₹1,000.00 | max=₹3,000.00"));
        let line3 = text.find("line 3:").unwrap();
        let line4 = text.find("line 4:").unwrap();
        assert!(line3 < line4);
    }
}
