//! Ratatui-based terminal UI.
//!
//! The session owns one loaded `Datasets` handle and one built series over the
//! configured range. Category toggles and view-range changes are answered from
//! that cached series; only fill changes and refreshes rebuild it.

use std::io;
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
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};
use tracing::warn;

use crate::domain::calendar::shift_months;
use crate::domain::{Category, FillStrategy, Month, SeriesConfig};
use crate::error::AppError;
use crate::io::Datasets;
use crate::query::{CategorySet, NormalizedSeries, filter_range, normalize};
use crate::series::SeriesOutput;

mod plotters_chart;

use plotters_chart::{TrendPlottersChart, category_color, chart_lines};

/// Milliseconds between revealed months in animate mode.
const ANIMATE_TICK_MS: u64 = 150;

/// Start the TUI.
pub fn run(config: SeriesConfig) -> Result<(), AppError> {
    // Load before touching the terminal so failures print normally.
    let datasets = crate::app::pipeline::load_datasets(&config)?;
    let mut app = App::new(config, datasets)?;

    let _guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

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

/// Which range bound the arrow keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// Progressive reveal of the visible months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Animation {
    shown: usize,
}

impl Animation {
    fn start() -> Self {
        Self { shown: 1 }
    }

    /// Reveal one more month; returns false once everything is shown.
    fn step(&mut self, total: usize) -> bool {
        if self.shown >= total {
            return false;
        }
        self.shown += 1;
        true
    }
}

struct App {
    config: SeriesConfig,
    datasets: Datasets,
    series: SeriesOutput,
    categories: CategorySet,
    view_start: NaiveDate,
    view_end: NaiveDate,
    bound: Bound,
    animation: Option<Animation>,
    status: String,
}

impl App {
    /// Build the initial series. A failed gap fill falls back to the unfilled
    /// series so the session still opens; the status line says why.
    fn new(mut config: SeriesConfig, datasets: Datasets) -> Result<Self, AppError> {
        let (series, status) = match crate::app::pipeline::run_series(&config, &datasets) {
            Ok(series) => (series, "Ready.".to_string()),
            Err(err) if config.fill_missing => {
                warn!(%err, "initial gap fill failed, starting without it");
                config.fill_missing = false;
                let series = crate::app::pipeline::run_series(&config, &datasets)?;
                (series, format!("Gap fill unavailable: {err}"))
            }
            Err(err) => return Err(err.into()),
        };
        let mut categories = CategorySet::from_selections(&config.categories);
        if categories.is_empty() {
            categories.toggle(Category::Csi);
        }
        Ok(Self {
            view_start: config.start.min(config.end),
            view_end: config.end.max(config.start),
            config,
            datasets,
            series,
            categories,
            bound: Bound::Start,
            animation: None,
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

            let timeout = if self.animation.is_some() { ANIMATE_TICK_MS } else { 100 };
            if !event::poll(Duration::from_millis(timeout))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                needs_redraw = self.tick();
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

    /// Advance the animation; returns whether anything changed.
    fn tick(&mut self) -> bool {
        let total = self.visible_months().len();
        let Some(animation) = &mut self.animation else {
            return false;
        };
        if animation.step(total) {
            return true;
        }
        self.animation = None;
        self.status = "Animation finished.".to_string();
        true
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                let category = Category::ALL[idx];
                let on = self.categories.toggle(category);
                self.status = format!(
                    "{}: {}",
                    category.display_name(),
                    if on { "shown" } else { "hidden" }
                );
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                self.bound = match self.bound {
                    Bound::Start => Bound::End,
                    Bound::End => Bound::Start,
                };
            }
            KeyCode::Left => self.shift_bound(-1),
            KeyCode::Right => self.shift_bound(1),
            KeyCode::Char('f') => {
                self.config.fill_missing = !self.config.fill_missing;
                if !self.rebuild(if self.config.fill_missing { "Gap fill on." } else { "Gap fill off." }) {
                    self.config.fill_missing = !self.config.fill_missing;
                }
            }
            KeyCode::Char('m') => {
                let previous = self.config.fill_strategy;
                self.config.fill_strategy = match previous {
                    FillStrategy::Linear => FillStrategy::Mean,
                    FillStrategy::Mean => FillStrategy::Linear,
                };
                let msg = format!("Fill strategy: {:?}", self.config.fill_strategy);
                if !self.rebuild(&msg) {
                    self.config.fill_strategy = previous;
                }
            }
            KeyCode::Char('a') => {
                if self.animation.take().is_some() {
                    self.status = "Animation stopped.".to_string();
                } else {
                    self.animation = Some(Animation::start());
                    self.status = "Animating...".to_string();
                }
            }
            KeyCode::Char('r') => match self.datasets.refresh() {
                Ok(()) => {
                    self.rebuild("Datasets reloaded.");
                }
                Err(err) => {
                    warn!(%err, "dataset refresh failed");
                    self.status = format!("Refresh failed: {err}");
                }
            },
            _ => {}
        }

        false
    }

    /// Move the selected view bound by one month, staying inside the built
    /// range and never crossing the other bound.
    fn shift_bound(&mut self, delta: i32) {
        let (lo, hi) = (self.config.start.min(self.config.end), self.config.end.max(self.config.start));
        match self.bound {
            Bound::Start => {
                if let Some(d) = shift_months(self.view_start, delta).filter(|d| *d >= lo && *d <= self.view_end) {
                    self.view_start = d;
                }
            }
            Bound::End => {
                if let Some(d) = shift_months(self.view_end, delta).filter(|d| *d <= hi && *d >= self.view_start) {
                    self.view_end = d;
                }
            }
        }
        self.status = format!(
            "View: {} .. {}",
            self.view_start.format("%Y-%m"),
            self.view_end.format("%Y-%m")
        );
    }

    /// Rebuild the cached series; on failure keep the previous one and return false.
    fn rebuild(&mut self, ok_message: &str) -> bool {
        match crate::app::pipeline::run_series(&self.config, &self.datasets) {
            Ok(series) => {
                self.series = series;
                self.status = ok_message.to_string();
                true
            }
            Err(err) => {
                warn!(%err, "series rebuild failed");
                self.status = format!("Rebuild failed: {err}");
                false
            }
        }
    }

    fn visible_months(&self) -> Vec<Month> {
        filter_range(&self.series.months, self.view_start, self.view_end)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("csi", Style::default().fg(Color::Cyan)),
            Span::raw(" | consumer spending index vs COVID-19"),
        ]));

        let months = &self.series.months;
        let estimated = months.iter().filter(|m| m.is_estimated()).count();
        let missing = months.iter().filter(|m| !m.is_complete()).count();
        lines.push(Line::from(Span::styled(
            format!(
                "range: {} .. {} | months: {} | estimated: {estimated} | missing: {missing} | fill: {}",
                self.config.start.format("%Y-%m"),
                self.config.end.format("%Y-%m"),
                months.len(),
                if self.config.fill_missing {
                    format!("{:?}", self.config.fill_strategy)
                } else {
                    "off".to_string()
                },
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(report) = &self.series.fill {
            let validation = report
                .validation
                .as_ref()
                .map(|v| {
                    format!(
                        " | rmse={} r2={}",
                        v.rmse.map(|x| format!("{x:.3}")).unwrap_or_else(|| "-".into()),
                        v.r_squared.map(|x| format!("{x:.3}")).unwrap_or_else(|| "-".into()),
                    )
                })
                .unwrap_or_default();
            lines.push(Line::from(Span::styled(
                format!("model: {}{validation}", report.model),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(30)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Trends (scaled 0-10)").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let visible = self.visible_months();
        if visible.is_empty() || self.categories.is_empty() {
            let msg = Paragraph::new("Nothing to show: select a category (1-4) or widen the range.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let normalized = chart_series(&visible, &self.categories, self.animation.map(|a| a.shown));
        let lines = chart_lines(&normalized);
        let months: Vec<NaiveDate> = visible.iter().map(|m| m.month).collect();
        let estimated: Vec<(f64, f64)> = if self.categories.contains(Category::Csi) {
            normalized
                .iter()
                .filter(|s| s.category == Category::Csi)
                .flat_map(|s| s.points.iter().enumerate())
                .filter(|(i, _)| visible[*i].is_estimated())
                .filter_map(|(i, (_, v))| v.map(|v| (i as f64, v)))
                .collect()
        } else {
            Vec::new()
        };

        let widget = TrendPlottersChart {
            lines: &lines,
            months: &months,
            estimated: &estimated,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut items = Vec::new();
        let marker = |b: Bound| if self.bound == b { "» " } else { "  " };
        items.push(ListItem::new(format!(
            "{}Start: {}",
            marker(Bound::Start),
            self.view_start.format("%Y-%m")
        )));
        items.push(ListItem::new(format!(
            "{}End:   {}",
            marker(Bound::End),
            self.view_end.format("%Y-%m")
        )));
        items.push(ListItem::new(""));
        for (i, category) in Category::ALL.iter().enumerate() {
            let on = self.categories.contains(*category);
            let style = if on {
                Style::default().fg(terminal_color(*category)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            items.push(ListItem::new(Line::from(Span::styled(
                format!("[{}] {} {}", if on { "x" } else { " " }, i + 1, category.display_name()),
                style,
            ))));
        }

        let list = List::new(items).block(Block::default().title("View").borders(Borders::ALL));
        frame.render_widget(list, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "1-4 categories  ↑/↓ bound  ←/→ move  f fill  m model  a animate  r reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Normalize the whole view window, then keep the first `shown` points of each
/// series. Scaling before the cut keeps the y axis fixed while animating.
fn chart_series(visible: &[Month], categories: &CategorySet, shown: Option<usize>) -> Vec<NormalizedSeries> {
    let mut series = normalize(visible, categories);
    if let Some(shown) = shown {
        for s in &mut series {
            s.points.truncate(shown);
        }
    }
    series
}

/// The chart color of a category, as a terminal color.
fn terminal_color(category: Category) -> Color {
    let plotters::style::RGBColor(r, g, b) = category_color(category);
    Color::Rgb(r, g, b)
}
