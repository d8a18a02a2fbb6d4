//! Formatted terminal output for the `report` subcommand.
//!
//! We keep formatting code in one place so:
//! - the assembler stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::data::LoadedCsv;
use crate::domain::ReportSelection;
use crate::report::{ChartData, ChartDescriptor, ChartGrid};

/// Format the run header (dataset stats + current selection).
pub fn format_report_header(loaded: &LoadedCsv, selection: &ReportSelection) -> String {
    let mut out = String::new();

    out.push_str("=== autodash - Automobile Sales Report ===\n");
    let mode = selection
        .mode
        .map(|m| m.display_name())
        .unwrap_or("(none)");
    out.push_str(&format!("Mode: {mode}\n"));
    let year = selection
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&format!("Year: {year}\n"));
    out.push_str(&format!(
        "Rows: read={} used={} skipped={}\n",
        loaded.rows_read,
        loaded.rows_used(),
        loaded.row_errors.len()
    ));
    for err in loaded.row_errors.iter().take(5) {
        out.push_str(&format!("  (line {}) {}\n", err.line, err.message));
    }
    out.push('\n');

    out
}

/// Format every chart in the grid as an aligned table.
pub fn format_chart_grid(grid: &ChartGrid) -> String {
    if grid.is_empty() {
        return "Nothing to render: select a report type (and a year for Yearly Statistics).\n"
            .to_string();
    }

    let mut out = String::new();
    for chart in grid.charts() {
        out.push_str(&format_chart(chart));
        out.push('\n');
    }
    out
}

fn format_chart(chart: &ChartDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n", chart.title));

    match &chart.data {
        ChartData::Line {
            x_label,
            y_label,
            points,
        } => {
            out.push_str(&header_row(x_label, y_label));
            for (x, y) in points {
                out.push_str(&format!("{:<20} {:>14.2}\n", x, y));
            }
        }
        ChartData::CategoryLine {
            x_label,
            y_label,
            points,
        } => {
            out.push_str(&header_row(x_label, y_label));
            for (x, y) in points {
                out.push_str(&format!("{:<20} {:>14.2}\n", truncate(x, 20), y));
            }
        }
        ChartData::Bar {
            x_label,
            y_label,
            bars,
        } => {
            out.push_str(&header_row(x_label, y_label));
            for (x, y) in bars {
                out.push_str(&format!("{:<20} {:>14.2}\n", truncate(x, 20), y));
            }
        }
        ChartData::Pie { slices } => {
            let total: f64 = slices.iter().map(|(_, v)| v).sum();
            out.push_str(&header_row("name", "share"));
            for (name, value) in slices {
                let share = if total > 0.0 { value / total * 100.0 } else { 0.0 };
                out.push_str(&format!("{:<20} {:>13.1}%\n", truncate(name, 20), share));
            }
        }
        ChartData::GroupedBar {
            x_label,
            groups,
            series,
            ..
        } => {
            out.push_str(&format!("{:<20}", truncate(x_label, 20)));
            for s in series {
                out.push_str(&format!(" {:>14}", truncate(&s.name, 14)));
            }
            out.push('\n');
            for (idx, group) in groups.iter().enumerate() {
                out.push_str(&format!("{:<20.2}", group));
                for s in series {
                    match s.values.get(idx).copied().flatten() {
                        Some(v) => out.push_str(&format!(" {:>14.2}", v)),
                        None => out.push_str(&format!(" {:>14}", "-")),
                    }
                }
                out.push('\n');
            }
        }
    }

    if chart_is_empty(&chart.data) {
        out.push_str("(no data)\n");
    }
    out
}

fn chart_is_empty(data: &ChartData) -> bool {
    match data {
        ChartData::Line { points, .. } => points.is_empty(),
        ChartData::CategoryLine { points, .. } => points.is_empty(),
        ChartData::Bar { bars, .. } => bars.is_empty(),
        ChartData::Pie { slices } => slices.is_empty(),
        ChartData::GroupedBar { groups, .. } => groups.is_empty(),
    }
}

fn header_row(x_label: &str, y_label: &str) -> String {
    format!(
        "{:<20} {:>14}\n{:-<20} {:-<14}\n",
        truncate(x_label, 20),
        truncate(y_label, 14),
        "",
        ""
    )
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dataset, ReportMode, SalesRecord};
    use crate::report::assemble;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            SalesRecord {
                year: 1980,
                month: "Jan".to_string(),
                recession: 1,
                automobile_sales: 100.0,
                vehicle_type: "Sports".to_string(),
                advertising_expenditure: 50.0,
                unemployment_rate: 6.0,
            },
            SalesRecord {
                year: 1980,
                month: "Feb".to_string(),
                recession: 1,
                automobile_sales: 200.0,
                vehicle_type: "Executivecar".to_string(),
                advertising_expenditure: 150.0,
                unemployment_rate: 6.5,
            },
        ])
    }

    #[test]
    fn empty_grid_renders_hint() {
        let text = format_chart_grid(&ChartGrid::empty());
        assert!(text.contains("Nothing to render"));
    }

    #[test]
    fn recession_report_contains_all_titles() {
        let grid = assemble(
            &dataset(),
            &ReportSelection::new(Some(ReportMode::Recession), None),
        );
        let text = format_chart_grid(&grid);
        assert!(text.contains("## Average Automobile Sales fluctuation over Recession Period"));
        assert!(text.contains("## Average Sales by Vehicle Type during Recession"));
        assert!(text.contains("## Total Advertising Expenditure Share by Vehicle Type"));
        assert!(text.contains("## Effect of Unemployment Rate on Vehicle Type and Sales"));
    }

    #[test]
    fn pie_shares_sum_to_hundred_percent() {
        let grid = assemble(
            &dataset(),
            &ReportSelection::new(Some(ReportMode::Recession), None),
        );
        let text = format_chart_grid(&grid);
        // 50 vs 150 advertising expenditure.
        assert!(text.contains("25.0%"));
        assert!(text.contains("75.0%"));
    }

    #[test]
    fn empty_yearly_subset_is_marked_no_data() {
        let grid = assemble(
            &dataset(),
            &ReportSelection::new(Some(ReportMode::Yearly), Some(1999)),
        );
        let text = format_chart_grid(&grid);
        assert!(text.contains("(no data)"));
    }
}
