//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel with the two report selectors (report
//! type, year) and renders the assembled chart grid. Every key event maps to
//! a new `ReportSelection`, which is fed through the pure assembler; the UI
//! never aggregates data itself.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use crate::app::pipeline::{self, LoadOutcome};
use crate::cli::DataArgs;
use crate::domain::{ReportMode, ReportSelection, parse_year, year_list, year_selector_enabled};
use crate::error::AppError;
use crate::report::{ChartGrid, assemble};

mod plotters_chart;

use plotters_chart::SalesChart;

/// Start the TUI.
pub fn run(args: &DataArgs) -> Result<(), AppError> {
    let outcome = pipeline::load_dataset(args)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(outcome);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

const FIELD_MODE: usize = 0;
const FIELD_YEAR: usize = 1;

struct App {
    outcome: LoadOutcome,
    mode: Option<ReportMode>,
    year: Option<i32>,
    selected_field: usize,
    editing_year: bool,
    year_input: String,
    status: String,
    grid: ChartGrid,
}

impl App {
    fn new(outcome: LoadOutcome) -> Self {
        let skipped = outcome.loaded.row_errors.len();
        let status = if skipped == 0 {
            format!("Loaded {} rows from {}.", outcome.loaded.rows_used(), outcome.source)
        } else {
            format!(
                "Loaded {} rows from {} ({} skipped).",
                outcome.loaded.rows_used(),
                outcome.source,
                skipped
            )
        };
        let mut app = Self {
            outcome,
            mode: None,
            year: None,
            selected_field: FIELD_MODE,
            editing_year: false,
            year_input: String::new(),
            status,
            grid: ChartGrid::empty(),
        };
        app.reassemble();
        app
    }

    fn selection(&self) -> ReportSelection {
        ReportSelection::new(self.mode, self.year)
    }

    /// Recompute the chart grid from the current selection.
    fn reassemble(&mut self) {
        self.grid = assemble(&self.outcome.loaded.dataset, &self.selection());
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_year {
            self.handle_year_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected_field = FIELD_MODE;
            }
            KeyCode::Down => {
                if year_selector_enabled(self.mode) {
                    self.selected_field = FIELD_YEAR;
                } else {
                    self.status = "Year selector is disabled for this report type.".to_string();
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == FIELD_YEAR && year_selector_enabled(self.mode) {
                    self.editing_year = true;
                    self.year_input.clear();
                    self.status =
                        "Editing year (1980-2023). Enter to apply, Esc to cancel.".to_string();
                }
            }
            _ => {}
        }

        false
    }

    fn handle_year_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_year = false;
                self.status = "Year edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_year = false;
                self.apply_year_input();
            }
            KeyCode::Backspace => {
                self.year_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() {
                    self.year_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_year_input(&mut self) {
        if self.year_input.trim().is_empty() {
            self.year = None;
            self.status = "Year cleared.".to_string();
        } else {
            // Typed input that does not parse as an in-range year is a user
            // error shown in the status line, never a crash.
            match parse_year(&self.year_input) {
                Ok(year) => {
                    self.year = Some(year);
                    self.status = format!("year: {year}");
                }
                Err(err) => {
                    self.status = format!("Invalid year: {err}");
                    return;
                }
            }
        }
        self.reassemble();
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            FIELD_MODE => {
                self.mode = cycle_mode(self.mode, delta);
                if !year_selector_enabled(self.mode) {
                    self.selected_field = FIELD_MODE;
                }
                self.status = format!(
                    "report: {}",
                    self.mode.map(|m| m.display_name()).unwrap_or("(none)")
                );
            }
            FIELD_YEAR => {
                if !year_selector_enabled(self.mode) {
                    return;
                }
                let years = year_list();
                let next = match self.year {
                    None => {
                        if delta >= 0 {
                            *years.start()
                        } else {
                            *years.end()
                        }
                    }
                    Some(y) => (y + delta.signum()).clamp(*years.start(), *years.end()),
                };
                self.year = Some(next);
                self.status = format!("year: {next}");
            }
            _ => {}
        }
        self.reassemble();
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("autodash", Style::default().fg(Color::Cyan)),
            Span::raw(" — U.S. Automobile Market Analysis Dashboard"),
        ]));

        let mode = self.mode.map(|m| m.display_name()).unwrap_or("(none)");
        let year = self
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(Line::from(Span::styled(
            format!(
                "report: {mode} | year: {year} | rows: {} | source: {}",
                self.outcome.loaded.rows_used(),
                self.outcome.source,
            ),
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(6)])
            .split(area);

        self.draw_charts(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_charts(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Charts").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if self.grid.is_empty() {
            let msg = Paragraph::new(
                "Select a report type (and a year for Yearly Statistics) to render charts.",
            )
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let n_rows = self.grid.rows.len();
        let row_constraints: Vec<Constraint> =
            vec![Constraint::Ratio(1, n_rows as u32); n_rows];
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(row_constraints)
            .split(inner);

        for (row, charts) in self.grid.rows.iter().enumerate() {
            let col_constraints: Vec<Constraint> =
                vec![Constraint::Ratio(1, charts.len() as u32); charts.len()];
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(col_constraints)
                .split(row_areas[row]);

            for (col, chart) in charts.iter().enumerate() {
                let cell_block = Block::default()
                    .title(truncate_title(&chart.title, cells[col].width))
                    .borders(Borders::ALL);
                let cell_inner = cell_block.inner(cells[col]);
                frame.render_widget(cell_block, cells[col]);
                frame.render_widget(SalesChart { data: &chart.data }, cell_inner);
            }
        }
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mode_label = self.mode.map(|m| m.display_name()).unwrap_or("(none)");
        let year_label = if year_selector_enabled(self.mode) {
            self.year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "(select a year)".to_string())
        } else {
            "(disabled)".to_string()
        };

        let items = vec![
            ListItem::new(format!("Report type: {mode_label}")),
            ListItem::new(format!("Year: {year_label}")),
        ];

        let list = List::new(items)
            .block(Block::default().title("Selection").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_year {
            let hint = Paragraph::new(format!("Year: {}_", self.year_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter type year  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Cycle the report selector: (none) → Yearly → Recession → (none).
fn cycle_mode(cur: Option<ReportMode>, delta: i32) -> Option<ReportMode> {
    let order = [None, Some(ReportMode::Yearly), Some(ReportMode::Recession)];
    let idx = order.iter().position(|m| *m == cur).unwrap_or(0) as i32;
    let len = order.len() as i32;
    let next = (idx + delta.signum()).rem_euclid(len);
    order[next as usize]
}

fn truncate_title(title: &str, width: u16) -> String {
    let max = width.saturating_sub(2) as usize;
    if title.chars().count() <= max {
        return title.to_string();
    }
    let mut out = String::new();
    for (i, ch) in title.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::DataSource;
    use crate::data::LoadedCsv;
    use crate::domain::{Dataset, SalesRecord};

    fn test_app() -> App {
        let dataset = Dataset::new(vec![SalesRecord {
            year: 1980,
            month: "Jan".to_string(),
            recession: 0,
            automobile_sales: 100.0,
            vehicle_type: "Sports".to_string(),
            advertising_expenditure: 50.0,
            unemployment_rate: 5.0,
        }]);
        App::new(LoadOutcome {
            loaded: LoadedCsv {
                dataset,
                row_errors: Vec::new(),
                rows_read: 1,
            },
            source: DataSource::LocalFile("test.csv".into()),
        })
    }

    #[test]
    fn invalid_typed_year_sets_status_and_keeps_year() {
        let mut app = test_app();
        app.mode = Some(ReportMode::Yearly);
        app.year = Some(1980);

        app.year_input = "1979".to_string();
        app.apply_year_input();
        assert!(app.status.starts_with("Invalid year:"), "{}", app.status);
        assert_eq!(app.year, Some(1980));
    }

    #[test]
    fn valid_typed_year_updates_selection_and_grid() {
        let mut app = test_app();
        app.mode = Some(ReportMode::Yearly);
        assert!(app.grid.is_empty());

        app.year_input = "1980".to_string();
        app.apply_year_input();
        assert_eq!(app.year, Some(1980));
        assert_eq!(app.status, "year: 1980");
        assert_eq!(app.grid.charts().count(), 4);
    }

    #[test]
    fn empty_typed_year_clears_the_selection() {
        let mut app = test_app();
        app.mode = Some(ReportMode::Yearly);
        app.year = Some(1980);

        app.year_input = String::new();
        app.apply_year_input();
        assert_eq!(app.year, None);
        assert!(app.grid.is_empty());
    }

    #[test]
    fn mode_cycle_is_a_three_state_ring() {
        let mut mode = None;
        mode = cycle_mode(mode, 1);
        assert_eq!(mode, Some(ReportMode::Yearly));
        mode = cycle_mode(mode, 1);
        assert_eq!(mode, Some(ReportMode::Recession));
        mode = cycle_mode(mode, 1);
        assert_eq!(mode, None);
        assert_eq!(cycle_mode(None, -1), Some(ReportMode::Recession));
    }
}
