//! Plotters-powered PNG renderer.
//!
//! Everything the chart shows is decided in `ChartSpec`; this module only maps
//! it onto Plotters primitives and writes the bitmap.

use std::error::Error;
use std::path::Path;

use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use super::{AxisSpec, ChartRenderer, ChartSpec, SeriesColor};
use crate::error::AppError;

type Ctx<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Smallest chart side, in pixels.
pub const MIN_CHART_SIDE: u32 = 150;
/// Largest chart side, in pixels.
pub const MAX_CHART_SIDE: u32 = 8000;

/// Writes charts as PNG bitmaps of a fixed pixel size.
#[derive(Debug, Clone, Copy)]
pub struct PngRenderer {
    pub width: u32,
    pub height: u32,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.clamp(MIN_CHART_SIDE, MAX_CHART_SIDE),
            height: height.clamp(MIN_CHART_SIDE, MAX_CHART_SIDE),
        }
    }
}

impl ChartRenderer for PngRenderer {
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), AppError> {
        draw_png(chart, path, (self.width, self.height))
            .map_err(|e| AppError::new(4, format!("Failed to render chart '{}': {e}", path.display())))
    }
}

fn draw_png(chart: &ChartSpec, path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = chart.x_range;
    let (y0, y1) = padded_range(&chart.primary, chart.zero_line);
    let x_labels = x_label_count(chart);

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(&chart.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80);

    match &chart.secondary {
        None => {
            let mut ctx = builder.build_cartesian_2d(x0..x1, y0..y1)?;
            configure_primary(&mut ctx, chart, x_labels)?;
            draw_axis_lines(&mut ctx, chart)?;
            draw_legend(&mut ctx)?;
        }
        Some(secondary) => {
            builder.right_y_label_area_size(80);
            let (s0, s1) = padded_range(secondary, false);
            let mut ctx = builder
                .build_cartesian_2d(x0..x1, y0..y1)?
                .set_secondary_coord(x0..x1, s0..s1);

            configure_primary(&mut *ctx, chart, x_labels)?;
            ctx.configure_secondary_axes()
                .y_desc(secondary.label.as_str())
                .axis_desc_style(("sans-serif", 18).into_font().color(&axis_color(secondary)))
                .label_style(("sans-serif", 14).into_font().color(&axis_color(secondary)))
                .draw()?;

            draw_axis_lines(&mut *ctx, chart)?;
            for line in &secondary.lines {
                let color = rgb(line.color);
                ctx.draw_secondary_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))?
                    .label(line.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
            draw_legend(&mut *ctx)?;
        }
    }

    root.present()?;
    Ok(())
}

fn configure_primary<'a, DB: DrawingBackend + 'a>(
    ctx: &mut Ctx<'a, DB>,
    chart: &ChartSpec,
    x_labels: usize,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let label_color = axis_color(&chart.primary);
    ctx.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.primary.label.as_str())
        .x_labels(x_labels)
        .y_labels(8)
        .x_label_formatter(&|h| format!("{:02}", h.round() as i64))
        .y_label_formatter(&|v| format!("{v:.1}"))
        .axis_desc_style(("sans-serif", 18).into_font().color(&label_color))
        .label_style(("sans-serif", 14).into_font().color(&label_color))
        .draw()
}

fn draw_axis_lines<'a, DB: DrawingBackend + 'a>(
    ctx: &mut Ctx<'a, DB>,
    chart: &ChartSpec,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if chart.zero_line {
        let (x0, x1) = chart.x_range;
        ctx.draw_series(LineSeries::new(vec![(x0, 0.0), (x1, 0.0)], BLACK.stroke_width(1)))?;
    }
    for line in &chart.primary.lines {
        let color = rgb(line.color);
        ctx.draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(ctx: &mut Ctx<'a, DB>) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()
}

/// Y bounds with 5% headroom; includes 0 when a zero line is drawn.
fn padded_range(axis: &AxisSpec, include_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = axis.value_range().unwrap_or((-1.0, 1.0));
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = hi - lo;
    let pad = if span > 0.0 { span * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad, hi + pad)
}

/// Enough labels for one every `x_tick_hours`.
fn x_label_count(chart: &ChartSpec) -> usize {
    let span = (chart.x_range.1 - chart.x_range.0).max(0.0);
    let step = f64::from(chart.x_tick_hours.max(1));
    (span / step).ceil() as usize + 1
}

fn axis_color(axis: &AxisSpec) -> RGBColor {
    axis.color.map(rgb).unwrap_or(BLACK)
}

fn rgb(color: SeriesColor) -> RGBColor {
    match color {
        SeriesColor::Blue => RGBColor(31, 119, 180),
        SeriesColor::Orange => RGBColor(255, 127, 14),
        SeriesColor::StrongBlue => RGBColor(0, 0, 255),
        SeriesColor::StrongRed => RGBColor(255, 0, 0),
    }
}
