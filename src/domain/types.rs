//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during chart assembly
//! - exported to JSON for scripting
//! - reused by future frontends

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// First year offered by the year selector.
pub const YEAR_MIN: i32 = 1980;
/// Last year offered by the year selector.
pub const YEAR_MAX: i32 = 2023;

/// The fixed list of selectable years.
///
/// The selector population is a constant range, independent of which years
/// actually occur in the loaded dataset.
pub fn year_list() -> std::ops::RangeInclusive<i32> {
    YEAR_MIN..=YEAR_MAX
}

/// One row of the automobile sales CSV.
///
/// Field names mirror the CSV header (including the lowercase
/// `unemployment_rate` column, which the source data really does spell that
/// way).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Recession")]
    pub recession: u8,
    #[serde(rename = "Automobile_Sales")]
    pub automobile_sales: f64,
    #[serde(rename = "Vehicle_Type")]
    pub vehicle_type: String,
    #[serde(rename = "Advertising_Expenditure")]
    pub advertising_expenditure: f64,
    #[serde(rename = "unemployment_rate")]
    pub unemployment_rate: f64,
}

impl SalesRecord {
    pub fn is_recession(&self) -> bool {
        self.recession == 1
    }
}

/// The loaded sales data: ordered, immutable after construction.
///
/// Constructed once at startup and passed by reference into the assembler;
/// there is no module-level global.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<SalesRecord>,
}

impl Dataset {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which top-level report is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Per-year statistics (requires a selected year).
    Yearly,
    /// Statistics over recession periods only.
    Recession,
}

impl ReportMode {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ReportMode::Yearly => "Yearly Statistics",
            ReportMode::Recession => "Recession Period Statistics",
        }
    }

    pub const ALL: [ReportMode; 2] = [ReportMode::Yearly, ReportMode::Recession];
}

/// Transient UI state: what the user currently has selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSelection {
    pub mode: Option<ReportMode>,
    pub year: Option<i32>,
}

impl ReportSelection {
    pub fn new(mode: Option<ReportMode>, year: Option<i32>) -> Self {
        Self { mode, year }
    }
}

/// Whether the year selector should accept input.
///
/// The year only matters for the Yearly report; for every other mode value
/// (including none at all) the selector is disabled.
pub fn year_selector_enabled(mode: Option<ReportMode>) -> bool {
    mode == Some(ReportMode::Yearly)
}

/// Validate a typed year value.
///
/// Free-form input (the TUI lets the user type a year) must parse as an
/// integer inside the selector range; anything else is a user-input error,
/// never a crash.
pub fn parse_year(input: &str) -> Result<i32, AppError> {
    let trimmed = input.trim();
    let year: i32 = trimmed
        .parse()
        .map_err(|_| AppError::new(2, format!("'{trimmed}' is not a valid year")))?;
    if !year_list().contains(&year) {
        return Err(AppError::new(
            2,
            format!("Year {year} is outside {YEAR_MIN}-{YEAR_MAX}"),
        ));
    }
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_selector_enabled_only_for_yearly() {
        assert!(year_selector_enabled(Some(ReportMode::Yearly)));
        assert!(!year_selector_enabled(Some(ReportMode::Recession)));
        assert!(!year_selector_enabled(None));
    }

    #[test]
    fn year_list_covers_fixed_range() {
        let years: Vec<i32> = year_list().collect();
        assert_eq!(years.first(), Some(&1980));
        assert_eq!(years.last(), Some(&2023));
        assert_eq!(years.len(), 44);
    }

    #[test]
    fn parse_year_accepts_in_range_input() {
        assert_eq!(parse_year("1995").unwrap(), 1995);
        assert_eq!(parse_year("  2023 ").unwrap(), 2023);
    }

    #[test]
    fn parse_year_rejects_garbage_and_out_of_range() {
        assert_eq!(parse_year("ninety").unwrap_err().exit_code(), 2);
        assert_eq!(parse_year("1979").unwrap_err().exit_code(), 2);
        assert_eq!(parse_year("2024").unwrap_err().exit_code(), 2);
        assert_eq!(parse_year("").unwrap_err().exit_code(), 2);
    }
}
