//! Chart assembly: from `(Dataset, ReportSelection)` to a grid of chart
//! descriptors.
//!
//! `assemble` is a pure function of its inputs. The UI calls it on every
//! selection change and renders whatever comes back; nothing here touches the
//! terminal or the network.

use serde::Serialize;

use crate::domain::{Dataset, ReportMode, ReportSelection, SalesRecord};
use crate::stats::{OrderedF64, mean_by, sum_by};

pub mod format;

/// The renderable payload of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    /// Line over a numeric (year) axis.
    Line {
        x_label: String,
        y_label: String,
        points: Vec<(i32, f64)>,
    },
    /// Line over a categorical (month) axis.
    CategoryLine {
        x_label: String,
        y_label: String,
        points: Vec<(String, f64)>,
    },
    /// One bar per category.
    Bar {
        x_label: String,
        y_label: String,
        bars: Vec<(String, f64)>,
    },
    /// Share-of-total slices.
    Pie { slices: Vec<(String, f64)> },
    /// Bars grouped by a numeric axis value, one series per category.
    GroupedBar {
        x_label: String,
        y_label: String,
        groups: Vec<f64>,
        series: Vec<GroupedSeries>,
    },
}

/// One colored series of a grouped bar chart.
///
/// `values` is aligned with the parent chart's `groups`; `None` means the
/// series has no observation for that group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedSeries {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// A single chart: title plus data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub title: String,
    pub data: ChartData,
}

/// The full render output: rows of charts (2×2 when a report is selected).
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ChartGrid {
    pub rows: Vec<Vec<ChartDescriptor>>,
}

impl ChartGrid {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All charts in row-major order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartDescriptor> {
        self.rows.iter().flatten()
    }
}

/// Build the chart grid for the current selection.
///
/// Returns an empty grid when no report mode is selected, or when the Yearly
/// report is selected without a year. Empty filtered subsets produce charts
/// with empty data rather than an error.
pub fn assemble(dataset: &Dataset, selection: &ReportSelection) -> ChartGrid {
    match selection.mode {
        Some(ReportMode::Recession) => recession_grid(dataset),
        Some(ReportMode::Yearly) => match selection.year {
            Some(year) => yearly_grid(dataset, year),
            None => ChartGrid::empty(),
        },
        None => ChartGrid::empty(),
    }
}

fn recession_grid(dataset: &Dataset) -> ChartGrid {
    let recession: Vec<&SalesRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.is_recession())
        .collect();

    let yearly_sales = mean_by(&recession, |r| r.year, |r| r.automobile_sales);
    let chart1 = ChartDescriptor {
        title: "Average Automobile Sales fluctuation over Recession Period".to_string(),
        data: ChartData::Line {
            x_label: "Year".to_string(),
            y_label: "Automobile_Sales".to_string(),
            points: yearly_sales,
        },
    };

    let sales_by_type = mean_by(&recession, |r| r.vehicle_type.clone(), |r| {
        r.automobile_sales
    });
    let chart2 = ChartDescriptor {
        title: "Average Sales by Vehicle Type during Recession".to_string(),
        data: ChartData::Bar {
            x_label: "Vehicle_Type".to_string(),
            y_label: "Automobile_Sales".to_string(),
            bars: sales_by_type,
        },
    };

    let ad_share = sum_by(&recession, |r| r.vehicle_type.clone(), |r| {
        r.advertising_expenditure
    });
    let chart3 = ChartDescriptor {
        title: "Total Advertising Expenditure Share by Vehicle Type".to_string(),
        data: ChartData::Pie { slices: ad_share },
    };

    let chart4 = ChartDescriptor {
        title: "Effect of Unemployment Rate on Vehicle Type and Sales".to_string(),
        data: unemployment_chart(&recession),
    };

    ChartGrid {
        rows: vec![vec![chart1, chart2], vec![chart3, chart4]],
    }
}

fn yearly_grid(dataset: &Dataset, year: i32) -> ChartGrid {
    let in_year: Vec<&SalesRecord> = dataset
        .records()
        .iter()
        .filter(|r| r.year == year)
        .collect();

    // Global yearly trend over the FULL dataset. This is intentionally not
    // filtered to the selected year: the chart shows overall context next to
    // the per-year views.
    let annual = mean_by(dataset.records(), |r| r.year, |r| r.automobile_sales);
    let chart1 = ChartDescriptor {
        title: "Annual Average Automobile Sales".to_string(),
        data: ChartData::Line {
            x_label: "Year".to_string(),
            y_label: "Automobile_Sales".to_string(),
            points: annual,
        },
    };

    let mut monthly = sum_by(&in_year, |r| r.month.clone(), |r| r.automobile_sales);
    monthly.sort_by_key(|(month, _)| month_sort_key(month));
    let chart2 = ChartDescriptor {
        title: format!("Total Monthly Automobile Sales in {year}"),
        data: ChartData::CategoryLine {
            x_label: "Month".to_string(),
            y_label: "Automobile_Sales".to_string(),
            points: monthly,
        },
    };

    let sales_by_type = mean_by(&in_year, |r| r.vehicle_type.clone(), |r| r.automobile_sales);
    let chart3 = ChartDescriptor {
        title: format!("Average Vehicles Sold by Vehicle Type in {year}"),
        data: ChartData::Bar {
            x_label: "Vehicle_Type".to_string(),
            y_label: "Automobile_Sales".to_string(),
            bars: sales_by_type,
        },
    };

    let ad_share = sum_by(&in_year, |r| r.vehicle_type.clone(), |r| {
        r.advertising_expenditure
    });
    let chart4 = ChartDescriptor {
        title: format!("Advertising Expenditure by Vehicle Type in {year}"),
        data: ChartData::Pie { slices: ad_share },
    };

    ChartGrid {
        rows: vec![vec![chart1, chart2], vec![chart3, chart4]],
    }
}

/// mean(Automobile_Sales) by (unemployment_rate, Vehicle_Type), pivoted so
/// each vehicle type becomes one series over the shared rate axis.
fn unemployment_chart(records: &[&SalesRecord]) -> ChartData {
    let table = mean_by(
        records,
        |r| (OrderedF64(r.unemployment_rate), r.vehicle_type.clone()),
        |r| r.automobile_sales,
    );

    let mut groups: Vec<f64> = Vec::new();
    for ((rate, _), _) in &table {
        if groups.last() != Some(&rate.0) {
            groups.push(rate.0);
        }
    }

    let mut names: Vec<String> = table.iter().map(|((_, t), _)| t.clone()).collect();
    names.sort();
    names.dedup();

    let mut series: Vec<GroupedSeries> = names
        .into_iter()
        .map(|name| GroupedSeries {
            name,
            values: vec![None; groups.len()],
        })
        .collect();

    for ((rate, vehicle_type), value) in &table {
        // Both lookups must hit: groups and series were built from `table`.
        let group_idx = groups
            .iter()
            .position(|g| g == &rate.0)
            .unwrap_or_default();
        if let Some(s) = series.iter_mut().find(|s| &s.name == vehicle_type) {
            s.values[group_idx] = Some(*value);
        }
    }

    ChartData::GroupedBar {
        x_label: "unemployment_rate".to_string(),
        y_label: "Automobile_Sales".to_string(),
        groups,
        series,
    }
}

/// Sort key placing recognized month names in calendar order; anything else
/// sorts after them, lexicographically.
fn month_sort_key(month: &str) -> (u8, String) {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let lower = month.to_ascii_lowercase();
    for (idx, prefix) in MONTHS.iter().enumerate() {
        if lower.starts_with(prefix) {
            return (idx as u8, String::new());
        }
    }
    (12, lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;

    fn record(
        year: i32,
        month: &str,
        recession: u8,
        sales: f64,
        vehicle_type: &str,
        ad: f64,
        unemployment: f64,
    ) -> SalesRecord {
        SalesRecord {
            year,
            month: month.to_string(),
            recession,
            automobile_sales: sales,
            vehicle_type: vehicle_type.to_string(),
            advertising_expenditure: ad,
            unemployment_rate: unemployment,
        }
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(vec![
            record(1980, "Jan", 1, 100.0, "Sports", 50.0, 6.0),
            record(1980, "Feb", 1, 300.0, "Sports", 70.0, 6.0),
            record(1980, "Jan", 1, 40.0, "Executivecar", 20.0, 6.5),
            record(1981, "Jan", 0, 500.0, "Sports", 90.0, 4.0),
            record(1981, "Feb", 0, 700.0, "Executivecar", 30.0, 4.0),
        ])
    }

    #[test]
    fn no_selection_renders_nothing() {
        let grid = assemble(&sample_dataset(), &ReportSelection::default());
        assert!(grid.is_empty());
    }

    #[test]
    fn yearly_without_year_renders_nothing() {
        let selection = ReportSelection::new(Some(ReportMode::Yearly), None);
        let grid = assemble(&sample_dataset(), &selection);
        assert!(grid.is_empty());
    }

    #[test]
    fn yearly_returns_two_rows_of_two_titled_charts() {
        let dataset = sample_dataset();
        for year in [1980, 1981] {
            let selection = ReportSelection::new(Some(ReportMode::Yearly), Some(year));
            let grid = assemble(&dataset, &selection);
            assert_eq!(grid.rows.len(), 2);
            assert_eq!(grid.rows[0].len(), 2);
            assert_eq!(grid.rows[1].len(), 2);

            let titles: Vec<&str> = grid.charts().map(|c| c.title.as_str()).collect();
            assert_eq!(titles[0], "Annual Average Automobile Sales");
            for title in &titles[1..] {
                assert!(title.contains(&year.to_string()), "title '{title}'");
            }
        }
    }

    #[test]
    fn recession_layout_ignores_year() {
        let dataset = sample_dataset();
        let with_year = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Recession), Some(1981)),
        );
        let without_year =
            assemble(&dataset, &ReportSelection::new(Some(ReportMode::Recession), None));
        assert_eq!(with_year, without_year);
        assert_eq!(with_year.charts().count(), 4);
    }

    #[test]
    fn bar_chart_is_exact_mean_per_vehicle_type() {
        let dataset = sample_dataset();
        let grid = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Recession), None),
        );
        let ChartData::Bar { bars, .. } = &grid.rows[0][1].data else {
            panic!("expected a bar chart");
        };
        // Recession rows: Sports 100+300, Executivecar 40.
        assert_eq!(
            bars,
            &vec![
                ("Executivecar".to_string(), 40.0),
                ("Sports".to_string(), 200.0)
            ]
        );
    }

    #[test]
    fn pie_chart_sums_advertising_expenditure() {
        let dataset = sample_dataset();
        let grid = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Yearly), Some(1980)),
        );
        let ChartData::Pie { slices } = &grid.rows[1][1].data else {
            panic!("expected a pie chart");
        };
        assert_eq!(
            slices,
            &vec![
                ("Executivecar".to_string(), 20.0),
                ("Sports".to_string(), 120.0)
            ]
        );
    }

    #[test]
    fn yearly_trend_uses_full_dataset() {
        let dataset = sample_dataset();
        let grid = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Yearly), Some(1980)),
        );
        let ChartData::Line { points, .. } = &grid.rows[0][0].data else {
            panic!("expected a line chart");
        };
        // Both years appear even though 1980 is selected.
        let years: Vec<i32> = points.iter().map(|(y, _)| *y).collect();
        assert_eq!(years, vec![1980, 1981]);
    }

    #[test]
    fn monthly_points_follow_calendar_order() {
        let dataset = Dataset::new(vec![
            record(1980, "Mar", 0, 1.0, "Sports", 1.0, 5.0),
            record(1980, "Jan", 0, 2.0, "Sports", 1.0, 5.0),
            record(1980, "Dec", 0, 3.0, "Sports", 1.0, 5.0),
        ]);
        let grid = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Yearly), Some(1980)),
        );
        let ChartData::CategoryLine { points, .. } = &grid.rows[0][1].data else {
            panic!("expected a category line chart");
        };
        let months: Vec<&str> = points.iter().map(|(m, _)| m.as_str()).collect();
        assert_eq!(months, vec!["Jan", "Mar", "Dec"]);
    }

    #[test]
    fn unemployment_chart_pivots_by_vehicle_type() {
        let dataset = sample_dataset();
        let grid = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Recession), None),
        );
        let ChartData::GroupedBar { groups, series, .. } = &grid.rows[1][1].data else {
            panic!("expected a grouped bar chart");
        };
        assert_eq!(groups, &vec![6.0, 6.5]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Executivecar");
        assert_eq!(series[0].values, vec![None, Some(40.0)]);
        assert_eq!(series[1].name, "Sports");
        assert_eq!(series[1].values, vec![Some(200.0), None]);
    }

    #[test]
    fn assemble_is_idempotent() {
        let dataset = sample_dataset();
        for selection in [
            ReportSelection::new(Some(ReportMode::Recession), None),
            ReportSelection::new(Some(ReportMode::Yearly), Some(1980)),
        ] {
            let a = assemble(&dataset, &selection);
            let b = assemble(&dataset, &selection);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn year_with_no_rows_yields_empty_charts_not_errors() {
        let dataset = sample_dataset();
        let grid = assemble(
            &dataset,
            &ReportSelection::new(Some(ReportMode::Yearly), Some(1999)),
        );
        assert_eq!(grid.charts().count(), 4);
        let ChartData::Bar { bars, .. } = &grid.rows[1][0].data else {
            panic!("expected a bar chart");
        };
        assert!(bars.is_empty());
    }
}
