/// CSV ingestion for labelled samples.
///
/// Supported format:
/// - UTF-8, comma-separated
/// - Optional header row (auto-detected: first row is a header if it contains
///   any non-numeric, non-empty cell)
/// - Double-quoted fields with embedded commas are handled correctly
/// - The last column is a non-negative integer class index; every other
///   column is a feature
use std::path::Path;

use crate::data::sample::Sample;
use crate::errors::{MlpError, Result};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads and parses a sample file.
pub fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_samples(&text).map_err(|e| match e {
        MlpError::Format { message } => MlpError::format(format!(
            "{}: {}",
            path.as_ref().display(),
            message
        )),
        other => other,
    })
}

/// Parses CSV text into samples.  All rows must share the same feature width.
pub fn parse_samples(text: &str) -> Result<Vec<Sample>> {
    let mut lines = text.lines().peekable();

    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut samples: Vec<Sample> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        let (label_cell, feature_cells) = match cells.split_last() {
            Some((label, features)) if !features.is_empty() => (label, features),
            _ => {
                return Err(MlpError::format(format!(
                    "Row {}: expected at least 2 columns (features + class index), got {}",
                    row_idx + 1,
                    cells.len()
                )))
            }
        };

        let features = parse_floats(feature_cells, row_idx + 1)?;
        let label = label_cell.trim().parse::<usize>().map_err(|_| {
            MlpError::format(format!(
                "Row {}: class index '{}' is not a non-negative integer",
                row_idx + 1,
                label_cell
            ))
        })?;

        if let Some(first) = samples.first() {
            if first.len() != features.len() {
                return Err(MlpError::format(format!(
                    "Row {}: feature count {} does not match first row's {}",
                    row_idx + 1,
                    features.len(),
                    first.len()
                )));
            }
        }

        samples.push(Sample::new(features, label));
    }

    if samples.is_empty() {
        return Err(MlpError::format("CSV contains no data rows after parsing"));
    }

    Ok(samples)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    parse_csv_row(line).iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| {
                MlpError::format(format!("Row {}: '{}' is not a valid number", row_num, c))
            })
        })
        .collect()
}
