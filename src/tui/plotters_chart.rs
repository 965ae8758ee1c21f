//! Plotters-powered trend chart widget for Ratatui.
//!
//! Every category is drawn on the shared 0–10 display scale against the month
//! index. A gap in a series splits it into separate line segments.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::Category;
use crate::query::{DISPLAY_MAX, DISPLAY_MIN, NormalizedSeries};

/// One category as drawable line segments in (month index, scaled value) space.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub category: Category,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// Split a normalized series at its gaps.
pub fn chart_lines(series: &[NormalizedSeries]) -> Vec<ChartLine> {
    series
        .iter()
        .map(|s| {
            let mut segments = Vec::new();
            let mut current = Vec::new();
            for (i, (_, value)) in s.points.iter().enumerate() {
                match value {
                    Some(v) => current.push((i as f64, *v)),
                    None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                    None => {}
                }
            }
            if !current.is_empty() {
                segments.push(current);
            }
            ChartLine {
                category: s.category,
                segments,
            }
        })
        .collect()
}

/// Line color for a category.
pub fn category_color(category: Category) -> RGBColor {
    match category {
        Category::CovidCases => RGBColor(255, 80, 80),
        Category::UnemploymentRate => RGBColor(255, 215, 0),
        Category::Cpi => RGBColor(0, 255, 255),
        Category::Csi => RGBColor(0, 255, 0),
    }
}

/// Render-only chart description; all series are prepared by the caller.
pub struct TrendPlottersChart<'a> {
    pub lines: &'a [ChartLine],
    /// Months on the x axis; index `i` is month `months[i]`.
    pub months: &'a [NaiveDate],
    /// Points whose CSI total was estimated, highlighted on top of the lines.
    pub estimated: &'a [(f64, f64)],
}

impl<'a> Widget for TrendPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = 0.0_f64;
        let x1 = (self.months.len().max(2) - 1) as f64;
        let months = self.months;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 4)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, DISPLAY_MIN..DISPLAY_MAX)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(6)
                .y_labels(3)
                .x_label_formatter(&|v| month_label(months, *v))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for line in self.lines {
                let color = category_color(line.category);
                for segment in &line.segments {
                    if segment.len() == 1 {
                        chart.draw_series(segment.iter().map(|&p| Pixel::new(p, color)))?;
                    } else {
                        chart.draw_series(LineSeries::new(segment.iter().copied(), &color))?;
                    }
                }
            }

            // `Pixel` rather than `Circle`: the backend maps circle radii poorly.
            chart.draw_series(self.estimated.iter().map(|&p| Pixel::new(p, WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn month_label(months: &[NaiveDate], index: f64) -> String {
    let i = index.round();
    if i < 0.0 {
        return String::new();
    }
    months
        .get(i as usize)
        .map(|m| m.format("%Y-%m").to_string())
        .unwrap_or_default()
}
