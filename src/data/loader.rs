//! CSV ingest and validation.
//!
//! This module turns the automobile sales CSV into a clean `Dataset` that is
//! safe to aggregate.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no aggregation logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::domain::{Dataset, SalesRecord};
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 7] = [
    "Year",
    "Month",
    "Recession",
    "Automobile_Sales",
    "Vehicle_Type",
    "Advertising_Expenditure",
    "unemployment_rate",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the dataset plus what was skipped along the way.
#[derive(Debug, Clone)]
pub struct LoadedCsv {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

impl LoadedCsv {
    pub fn rows_used(&self) -> usize {
        self.dataset.len()
    }
}

/// Open and parse a local CSV file.
pub fn read_sales_csv_path(path: &Path) -> Result<LoadedCsv, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_sales_csv(file)
}

/// Parse the sales CSV from any reader.
///
/// Malformed rows are skipped and reported via `row_errors`; only a missing
/// or broken header is fatal.
pub fn read_sales_csv<R: Read>(reader: R) -> Result<LoadedCsv, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    ensure_required_columns(&headers)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.deserialize::<SalesRecord>().enumerate() {
        // +2 because:
        // - deserialize() starts at line 1 after headers
        // - CSV is 1-based line numbers
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

        match validate_record(&record) {
            Ok(()) => records.push(record),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(LoadedCsv {
        dataset: Dataset::new(records),
        row_errors,
        rows_read,
    })
}

fn ensure_required_columns(headers: &csv::StringRecord) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("CSV is missing required column(s): {}", missing.join(", ")),
        ))
    }
}

fn validate_record(record: &SalesRecord) -> Result<(), String> {
    if record.recession > 1 {
        return Err(format!(
            "Recession flag must be 0 or 1, got {}",
            record.recession
        ));
    }
    if !record.automobile_sales.is_finite() {
        return Err("Automobile_Sales is not a finite number".to_string());
    }
    if !record.advertising_expenditure.is_finite() {
        return Err("Advertising_Expenditure is not a finite number".to_string());
    }
    if !record.unemployment_rate.is_finite() {
        return Err("unemployment_rate is not a finite number".to_string());
    }
    Ok(())
}
