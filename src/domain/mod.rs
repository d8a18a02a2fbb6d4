//! Shared domain types for the sales dashboard.

mod types;

pub use types::{
    Dataset, ReportMode, ReportSelection, SalesRecord, YEAR_MAX, YEAR_MIN, parse_year, year_list,
    year_selector_enabled,
};
