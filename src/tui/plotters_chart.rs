//! Plotters-powered chart widgets for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - one code path for all four chart kinds (line, bar, pie, grouped bar)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::element::Pie;
use plotters::style::Color as _;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::report::{ChartData, GroupedSeries};

/// High-contrast palette for terminal rendering.
const PALETTE: [RGBColor; 6] = [
    RGBColor(0, 255, 255), // cyan
    RGBColor(0, 255, 0),   // green
    RGBColor(255, 0, 0),   // red
    RGBColor(255, 255, 0), // yellow
    RGBColor(255, 0, 255), // magenta
    RGBColor(64, 128, 255), // blue
];

/// A render-only widget for one chart descriptor.
///
/// The widget is intentionally data-driven: all aggregation happens in the
/// assembler, so `render()` only has to map a `ChartData` onto Plotters
/// primitives.
pub struct SalesChart<'a> {
    pub data: &'a ChartData,
}

impl Widget for SalesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 16 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        if chart_is_empty(self.data) {
            buf.set_string(
                area.x,
                area.y,
                "(no data)",
                Style::default().fg(Color::Gray),
            );
            return;
        }

        match self.data {
            ChartData::Line {
                x_label,
                y_label,
                points,
            } => render_line(area, buf, x_label, y_label, points),
            ChartData::CategoryLine {
                x_label,
                y_label,
                points,
            } => render_category_line(area, buf, x_label, y_label, points),
            ChartData::Bar {
                x_label,
                y_label,
                bars,
            } => render_bars(area, buf, x_label, y_label, bars),
            ChartData::Pie { slices } => render_pie(area, buf, slices),
            ChartData::GroupedBar {
                x_label,
                y_label,
                groups,
                series,
            } => render_grouped_bars(area, buf, x_label, y_label, groups, series),
        }
    }
}

fn chart_is_empty(data: &ChartData) -> bool {
    match data {
        ChartData::Line { points, .. } => points.is_empty(),
        ChartData::CategoryLine { points, .. } => points.is_empty(),
        ChartData::Bar { bars, .. } => bars.is_empty(),
        ChartData::Pie { slices } => slices.is_empty(),
        ChartData::GroupedBar { groups, series, .. } => groups.is_empty() || series.is_empty(),
    }
}

fn render_line(area: Rect, buf: &mut Buffer, x_label: &str, y_label: &str, points: &[(i32, f64)]) {
    let series: Vec<(f64, f64)> = points.iter().map(|&(x, y)| (x as f64, y)).collect();

    let mut x0 = series.first().map(|p| p.0).unwrap_or(0.0);
    let mut x1 = series.last().map(|p| p.0).unwrap_or(1.0);
    if x1 <= x0 {
        // Single-year dataset still needs a non-degenerate axis.
        x0 -= 0.5;
        x1 += 0.5;
    }
    let [y0, y1] = padded_y_bounds(series.iter().map(|p| p.1));

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 6)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .draw()?;

        chart.draw_series(LineSeries::new(series.iter().copied(), &PALETTE[0]))?;
        chart.draw_series(
            series
                .iter()
                .map(|&(x, y)| Pixel::new((x, y), PALETTE[1])),
        )?;

        Ok(())
    });

    widget.render(area, buf);
}

fn render_category_line(
    area: Rect,
    buf: &mut Buffer,
    x_label: &str,
    y_label: &str,
    points: &[(String, f64)],
) {
    let labels: Vec<&str> = points.iter().map(|(l, _)| l.as_str()).collect();
    let series: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, y))| (i as f64, *y))
        .collect();
    let [y0, y1] = padded_y_bounds(series.iter().map(|p| p.1));
    let x1 = (series.len() as f64 - 1.0).max(1.0);

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 6)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(-0.5..x1 + 0.5, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(labels.len().min(12))
            .y_labels(5)
            .x_label_formatter(&|v| category_label(&labels, *v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .draw()?;

        chart.draw_series(LineSeries::new(series.iter().copied(), &PALETTE[0]))?;
        chart.draw_series(
            series
                .iter()
                .map(|&(x, y)| Pixel::new((x, y), PALETTE[1])),
        )?;

        Ok(())
    });

    widget.render(area, buf);
}

fn render_bars(area: Rect, buf: &mut Buffer, x_label: &str, y_label: &str, bars: &[(String, f64)]) {
    let labels: Vec<&str> = bars.iter().map(|(l, _)| l.as_str()).collect();
    let values: Vec<f64> = bars.iter().map(|(_, v)| *v).collect();
    let [y0, y1] = bar_y_bounds(values.iter().copied());
    let x1 = bars.len() as f64 - 0.5;

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 6)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(-0.5..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(labels.len())
            .y_labels(5)
            .x_label_formatter(&|v| category_label(&labels, *v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            let color = PALETTE[i % PALETTE.len()];
            Rectangle::new([(i as f64 - 0.35, 0.0), (i as f64 + 0.35, v)], color.filled())
        }))?;

        Ok(())
    });

    widget.render(area, buf);
}

fn render_pie(area: Rect, buf: &mut Buffer, slices: &[(String, f64)]) {
    let total: f64 = slices.iter().map(|(_, v)| v).sum();
    if !(total.is_finite() && total > 0.0) {
        buf.set_string(
            area.x,
            area.y,
            "(no data)",
            Style::default().fg(Color::Gray),
        );
        return;
    }

    let sizes: Vec<f64> = slices.iter().map(|(_, v)| *v).collect();
    let labels: Vec<String> = slices
        .iter()
        .map(|(name, v)| format!("{name} {:.0}%", v / total * 100.0))
        .collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();

    let widget = widget_fn(move |root| {
        let (w, h) = root.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = (w.min(h) as f64 / 2.0 - 1.0).max(1.0);

        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 10).into_font().color(&WHITE));
        root.draw(&pie)?;

        Ok(())
    });

    widget.render(area, buf);
}

fn render_grouped_bars(
    area: Rect,
    buf: &mut Buffer,
    x_label: &str,
    y_label: &str,
    groups: &[f64],
    series: &[GroupedSeries],
) {
    let group_labels: Vec<String> = groups.iter().map(|g| format!("{g:.1}")).collect();
    let max_value = series
        .iter()
        .flat_map(|s| s.values.iter().copied().flatten())
        .fold(0.0_f64, f64::max);
    let [y0, y1] = bar_y_bounds(std::iter::once(max_value));
    let x1 = groups.len() as f64 - 0.5;
    // Sub-bar width so each group's bars fill 80% of its slot.
    let width = 0.8 / series.len() as f64;

    let widget = widget_fn(move |root| {
        let mut chart = ChartBuilder::on(&root)
            .margin(1)
            .set_label_area_size(LabelAreaPosition::Left, 6)
            .set_label_area_size(LabelAreaPosition::Bottom, 3)
            .build_cartesian_2d(-0.5..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_labels(group_labels.len().min(10))
            .y_labels(5)
            .x_label_formatter(&|v| {
                let refs: Vec<&str> = group_labels.iter().map(|s| s.as_str()).collect();
                category_label(&refs, *v)
            })
            .y_label_formatter(&|v| format!("{:.0}", v))
            .label_style(("sans-serif", 10).into_font().color(&WHITE))
            .axis_style(&WHITE)
            .draw()?;

        for (series_idx, s) in series.iter().enumerate() {
            let color = PALETTE[series_idx % PALETTE.len()];
            chart.draw_series(s.values.iter().enumerate().filter_map(|(group_idx, v)| {
                let v = (*v)?;
                let x0 = group_idx as f64 - 0.4 + series_idx as f64 * width;
                Some(Rectangle::new([(x0, 0.0), (x0 + width, v)], color.filled()))
            }))?;
        }

        Ok(())
    });

    widget.render(area, buf);
}

/// Map a fractional axis position back to the category label at that index.
///
/// Returns an empty string away from integer positions so labels don't repeat.
fn category_label(labels: &[&str], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 0.3 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|l| l.to_string())
        .unwrap_or_default()
}

fn padded_y_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        return [0.0, 1.0];
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    [y_min - pad, y_max + pad]
}

/// Bar charts are anchored at zero.
fn bar_y_bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let y_max = values.fold(0.0_f64, f64::max);
    if !y_max.is_finite() || y_max <= 0.0 {
        return [0.0, 1.0];
    }
    [0.0, y_max * 1.05]
}
