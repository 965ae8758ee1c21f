//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Every series is drawn on the shared 0–10 display scale produced by
//! `query::normalize`, one glyph per category. Gaps break the line.

use crate::domain::Category;
use crate::query::{DISPLAY_MAX, DISPLAY_MIN, NormalizedSeries};

/// Glyph used for a category's line.
pub fn glyph(category: Category) -> char {
    match category {
        Category::CovidCases => 'c',
        Category::UnemploymentRate => 'u',
        Category::Cpi => 'p',
        Category::Csi => 's',
    }
}

/// Render normalized series as a line chart.
pub fn render_ascii_plot(series: &[NormalizedSeries], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let mut grid = vec![vec![' '; width]; height];

    let n = series.iter().map(|s| s.points.len()).max().unwrap_or(0);

    for s in series {
        let ch = glyph(s.category);
        let mut prev: Option<(usize, usize)> = None;
        for (i, (_, value)) in s.points.iter().enumerate() {
            let Some(v) = value else {
                prev = None;
                continue;
            };
            let x = map_x(i, n, width);
            let y = map_y(*v, height);
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, x, y, ch),
                None => grid[y][x] = ch,
            }
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    let (first, last) = date_span(series);
    out.push_str(&format!(
        "Plot: {first} .. {last} | scale=[{DISPLAY_MIN:.0}, {DISPLAY_MAX:.0}]\n"
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    let legend: Vec<String> = series
        .iter()
        .map(|s| format!("{} {}", glyph(s.category), s.category.display_name()))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join(" | ")));
    out
}

fn date_span(series: &[NormalizedSeries]) -> (String, String) {
    let dates = series.first().map(|s| s.points.as_slice()).unwrap_or(&[]);
    match (dates.first(), dates.last()) {
        (Some(a), Some(b)) => (a.0.format("%Y-%m").to_string(), b.0.format("%Y-%m").to_string()),
        _ => ("-".to_string(), "-".to_string()),
    }
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, height: usize) -> usize {
    let u = ((v - DISPLAY_MIN) / (DISPLAY_MAX - DISPLAY_MIN)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Later series only overwrite blanks.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(category: Category, values: &[Option<f64>]) -> NormalizedSeries {
        NormalizedSeries {
            category,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| (NaiveDate::from_ymd_opt(2020, 3 + i as u32, 1).unwrap(), *v))
                .collect(),
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let s = vec![
            series(Category::Csi, &[Some(0.0), Some(10.0)]),
            series(Category::CovidCases, &[Some(5.0), None]),
        ];
        let txt = render_ascii_plot(&s, 10, 5);
        let expected = concat!(
            "Plot: 2020-03 .. 2020-04 | scale=[0, 10]\n",
            "        ss\n",
            "      ss\n",
            "c   ss\n",
            "  ss\n",
            "ss\n",
            "Legend: s CSI | c Covid Cases\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_input_renders_a_blank_frame() {
        let txt = render_ascii_plot(&[], 10, 5);
        assert!(txt.starts_with("Plot: - .. - "));
        assert_eq!(txt.lines().count(), 7);
    }
}
