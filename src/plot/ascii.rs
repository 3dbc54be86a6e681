//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - a quick look at a day's data without opening the PNGs
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - series: `*` joined by `.`
//! - zero line: `-` (when zero is inside the y-range)

use crate::series::DailySeries;

/// Render one daily series over the full 0-24h axis.
pub fn render_ascii_series(series: &DailySeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let header = format!(
        "{} {} [{}] | n={}",
        series.date().format("%Y%m%d"),
        series.quantity().label(),
        series.quantity().unit(),
        series.len()
    );

    let Some((y_min, y_max)) = series.value_range() else {
        return format!("{header} | no data\n");
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    if y_min < 0.0 && y_max > 0.0 {
        let row = map_y(0.0, y_min, y_max, height);
        for cell in grid[row].iter_mut() {
            *cell = '-';
        }
    }

    let points: Vec<(usize, usize)> = series
        .hour_points()
        .into_iter()
        .map(|(h, v)| (map_x(h, 0.0, 24.0, width), map_y(v, y_min, y_max, height)))
        .collect();

    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        draw_line(&mut grid, x0, y0, x1, y1, '.');
    }
    for &(x, y) in &points {
        grid[y][x] = '*';
    }

    let mut out = String::new();
    out.push_str(&format!("{header} | y=[{y_min:.2}, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&hour_ruler(width));
    out.push('\n');

    out
}

/// `00`, `06`, `12`, `18`, `24` markers under the grid (skipped when they would touch).
fn hour_ruler(width: usize) -> String {
    let mut ruler = vec![' '; width + 1];
    let mut last_end = 0;
    for h in [0u32, 6, 12, 18, 24] {
        let start = map_x(f64::from(h), 0.0, 24.0, width).min(width - 1);
        if h > 0 && start <= last_end {
            continue;
        }
        for (i, ch) in format!("{h:02}").chars().enumerate() {
            if let Some(cell) = ruler.get_mut(start + i) {
                *cell = ch;
            }
        }
        last_end = start + 2;
    }
    ruler.into_iter().collect::<String>().trim_end().to_string()
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span > 0.0 { span * frac } else { min.abs().max(1.0) * frac };
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only fills blank or zero-line cells.
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
        if let Some(cell) = grid
            .get_mut(y0 as usize)
            .and_then(|row| row.get_mut(x0 as usize))
        {
            if *cell == ' ' || *cell == '-' {
                *cell = ch;
            }
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
