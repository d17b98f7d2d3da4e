//! Ratatui-based series browser.
//!
//! Left: every series of the dataset. Right: the selected series (or all of
//! them) rebased to its first observation. Footer: the selected series'
//! coverage row and key help.

use std::io;
use std::path::Path;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::warn;

use crate::domain::{ColumnLabel, CoverageReport, Dataset, SeriesTable};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{SeriesPlottersChart, line_color};

/// Start the browser on an already loaded dataset.
pub fn run(dataset: Dataset, source: &Path) -> Result<(), AppError> {
    let mut app = App::new(&dataset, source.display().to_string())?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Restores the terminal (raw mode, alternate screen) on exit, including on error.
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

struct App {
    source: String,
    /// Pivoted values, rebased per column.
    table: SeriesTable,
    coverage: Option<CoverageReport>,
    selected: usize,
    show_all: bool,
    status: String,
}

impl App {
    fn new(dataset: &Dataset, source: String) -> Result<Self, AppError> {
        let table = crate::chart::rebase(&crate::summary::pivot(dataset));
        if table.is_empty() {
            return Err(AppError::new(3, "Dataset has no series to browse."));
        }

        // A series with too little history should not keep the others from being browsed.
        let (coverage, status) = match crate::summary::describe_dates(dataset) {
            Ok(report) => (Some(report), format!("{} series", table.n_cols())),
            Err(err) => {
                warn!(%err, "coverage unavailable");
                (None, format!("coverage unavailable: {err}"))
            }
        };

        Ok(Self {
            source,
            table,
            coverage,
            selected: 0,
            show_all: false,
            status,
        })
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
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
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the browser should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        let n = self.table.n_cols();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = (self.selected + n - 1) % n,
            KeyCode::Down => self.selected = (self.selected + 1) % n,
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = n - 1,
            KeyCode::Char('a') => {
                self.show_all = !self.show_all;
                self.status = if self.show_all { "showing all series" } else { "showing selected series" }.to_string();
            }
            _ => {}
        }
        false
    }

    /// Column indices currently drawn.
    fn visible_columns(&self) -> Vec<usize> {
        if self.show_all {
            (0..self.table.n_cols()).collect()
        } else {
            vec![self.selected]
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(frame.area());

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(24), Constraint::Min(0)])
            .split(chunks[0]);

        self.draw_series_list(frame, body[0]);
        self.draw_chart(frame, body[1]);
        self.draw_footer(frame, chunks[1]);
    }

    fn draw_series_list(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let visible = self.visible_columns();
        let items: Vec<ListItem> = self
            .table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let style = match visible.iter().position(|&v| v == idx) {
                    Some(slot) => Style::default().fg(line_color(slot)),
                    None => Style::default().fg(Color::Gray),
                };
                ListItem::new(Span::styled(c.key.label(), style))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Series").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("» ");
        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = if self.show_all {
            "Rebased: all series".to_string()
        } else {
            format!("Rebased: {}", self.table.columns[self.selected].key.label())
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let lines = chart_lines(&self.table, &self.visible_columns());
        let Some((x_bounds, y_bounds)) = chart_bounds(&lines) else {
            let msg = Paragraph::new("No finite values to plot.").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        frame.render_widget(
            SeriesPlottersChart {
                lines: &lines,
                x_bounds,
                y_bounds,
            },
            chart_rect,
        );

        if let (Some(insets), Some(&origin)) = (insets, self.table.index.first()) {
            draw_axis_ticks(frame, inner, chart_rect, insets, origin, x_bounds, y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let key = &self.table.columns[self.selected].key;
        let coverage = self
            .coverage
            .as_ref()
            .and_then(|c| c.find(&key.currency, &key.term))
            .map(|r| {
                format!(
                    "{}: {} .. {} | gap {}d | fill {:.1}%",
                    key.label(),
                    r.min,
                    r.max,
                    r.gap,
                    r.fill * 100.0
                )
            })
            .unwrap_or_else(|| format!("{}: no coverage", key.label()));

        let lines = vec![
            Line::from(Span::styled(coverage, Style::default().fg(Color::White))),
            Line::from(vec![
                Span::styled("↑/↓ select  a all  q quit", Style::default().fg(Color::Gray)),
                Span::raw(" | "),
                Span::styled(&self.source, Style::default().fg(Color::Gray)),
                Span::raw(" | "),
                Span::styled(&self.status, Style::default().fg(Color::Yellow)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL)), area);
    }
}

/// `(day offset, value)` points of the given columns, skipping missing values.
fn chart_lines(table: &SeriesTable, columns: &[usize]) -> Vec<Vec<(f64, f64)>> {
    let Some(&origin) = table.index.first() else {
        return Vec::new();
    };
    columns
        .iter()
        .filter_map(|&idx| table.columns.get(idx))
        .map(|c| {
            table
                .index
                .iter()
                .zip(&c.values)
                .filter(|(_, v)| v.is_finite())
                .map(|(d, v)| ((*d - origin).num_days() as f64, *v))
                .collect()
        })
        .collect()
}

/// Padded x/y bounds over all points, or `None` when there is nothing to draw.
fn chart_bounds(lines: &[Vec<(f64, f64)>]) -> Option<([f64; 2], [f64; 2])> {
    let mut x = [f64::INFINITY, f64::NEG_INFINITY];
    let mut y = [f64::INFINITY, f64::NEG_INFINITY];
    for &(px, py) in lines.iter().flatten() {
        x = [x[0].min(px), x[1].max(px)];
        y = [y[0].min(py), y[1].max(py)];
    }
    if !x[0].is_finite() || !y[0].is_finite() {
        return None;
    }
    if x[1] <= x[0] {
        x[1] = x[0] + 1.0;
    }
    let pad = ((y[1] - y[0]).abs() * 0.05).max(1e-9);
    Some((x, [y[0] - pad, y[1] + pad]))
}

fn fmt_tick_date(origin: NaiveDate, offset: f64) -> String {
    (origin + chrono::Duration::days(offset.round() as i64)).format("%Y-%m").to_string()
}

/// Rebased values are small; show enough precision to tell ticks apart.
fn fmt_tick_value(v: f64, span: f64) -> String {
    if span >= 10.0 {
        format!("{v:.1}")
    } else if span >= 0.1 {
        format!("{v:.3}")
    } else {
        format!("{v:.5}")
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 0,
        bottom: 1,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };
    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    origin: NaiveDate,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    const TICKS: usize = 5;
    let style = Style::default().fg(Color::Gray);

    let x_row = chart.y + chart.height;
    if x_row < inner.y + inner.height {
        for i in 0..TICKS {
            let u = i as f64 / (TICKS - 1) as f64;
            let label = fmt_tick_date(origin, x_bounds[0] + u * (x_bounds[1] - x_bounds[0]));
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let width = label.len() as u16;
            let start = x
                .saturating_sub(width / 2)
                .min((chart.x + chart.width).saturating_sub(width));
            frame.render_widget(
                Paragraph::new(label).style(style),
                Rect {
                    x: start,
                    y: x_row,
                    width,
                    height: 1,
                },
            );
        }
    }

    let span = y_bounds[1] - y_bounds[0];
    for i in 0..TICKS {
        let u = i as f64 / (TICKS - 1) as f64;
        let label = fmt_tick_value(y_bounds[0] + u * span, span);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let width = insets.left.saturating_sub(1);
        frame.render_widget(
            Paragraph::new(label).alignment(Alignment::Right).style(style),
            Rect {
                x: inner.x,
                y,
                width,
                height: 1,
            },
        );
    }
}
