//! Chart descriptions and renderers.
//!
//! Charts are built as plain data (`ChartSpec`) from assembled series, then
//! handed to a [`ChartRenderer`]. Building is deterministic and cheap to test;
//! rendering is the only part that touches the filesystem.
//!
//! - `png`: Plotters bitmap renderer (the saved artifacts)
//! - `ascii`: terminal preview

use std::path::Path;

use chrono::{NaiveDate, TimeDelta};

use crate::domain::Quantity;
use crate::error::AppError;
use crate::series::{DailySeries, DualAxisSeries};

pub mod ascii;
pub mod png;

pub use ascii::render_ascii_series;
pub use png::PngRenderer;

/// Series colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesColor {
    /// Muted blue (`#1f77b4`).
    Blue,
    /// Muted orange (`#ff7f0e`).
    Orange,
    /// Pure blue.
    StrongBlue,
    /// Pure red.
    StrongRed,
}

/// One polyline on a chart, in `(hours since midnight, value)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpec {
    pub label: String,
    pub color: SeriesColor,
    pub points: Vec<(f64, f64)>,
}

impl LineSpec {
    pub fn from_series(series: &DailySeries, color: SeriesColor) -> Self {
        Self {
            label: series.quantity().label().to_string(),
            color,
            points: series.hour_points(),
        }
    }
}

/// A y-axis and the series plotted against it.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub label: String,
    /// Tint the axis label with the series color (dual-axis charts).
    pub color: Option<SeriesColor>,
    pub lines: Vec<LineSpec>,
}

impl AxisSpec {
    /// `(min, max)` over every point on this axis.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.lines.iter().flat_map(|l| l.points.iter().map(|&(_, y)| y));
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Fully formed chart handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    /// X range in hours since midnight.
    pub x_range: (f64, f64),
    /// Spacing of the labelled x ticks, in hours.
    pub x_tick_hours: u32,
    pub primary: AxisSpec,
    pub secondary: Option<AxisSpec>,
    /// Draw a horizontal line at y = 0 on the primary axis.
    pub zero_line: bool,
}

/// The charts produced for each date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartKind {
    /// Bt and Bz over the full day.
    BzBt,
    /// Bz with the tail truncated.
    TruncatedBz,
    /// Bz (left axis) against solar wind speed (right axis).
    BzSpeed,
    /// Solar wind speed on its own.
    Speed,
}

impl ChartKind {
    /// Artifact file name for `date`.
    pub fn file_name(self, date: NaiveDate) -> String {
        let date = date.format("%Y%m%d");
        match self {
            ChartKind::BzBt => format!("{date}BzandBt.png"),
            ChartKind::TruncatedBz => format!("{date}_Bz.png"),
            ChartKind::BzSpeed => format!("{date}BzandSWSpeed.png"),
            ChartKind::Speed => format!("{date}_SWSpeed.png"),
        }
    }
}

/// Something that turns a `ChartSpec` into an image file.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec, path: &Path) -> Result<(), AppError>;
}

const FIELD_AXIS_LABEL: &str = "Magnetic Flux Density [nT]";

/// Bt and Bz for one day, x-range clipped to the data.
pub fn bz_bt_chart(bz: &DailySeries, bt: &DailySeries) -> Option<ChartSpec> {
    let pair = DualAxisSeries::new(bz.clone(), bt.clone()).ok()?;
    let (first, last) = pair.time_span()?;

    Some(ChartSpec {
        title: format!("{} Bt and Bz", bz.date().format("%Y%m%d")),
        x_label: "Time [hours UT]".to_string(),
        x_range: hour_range(first.as_hours_f64(), last.as_hours_f64()),
        x_tick_hours: 2,
        primary: AxisSpec {
            label: FIELD_AXIS_LABEL.to_string(),
            color: None,
            lines: non_empty_lines([(bt, SeriesColor::Blue), (bz, SeriesColor::Orange)]),
        },
        secondary: None,
        zero_line: true,
    })
}

/// Bz with the last `truncate` dropped; x-range runs to the cutoff.
pub fn truncated_bz_chart(bz: &DailySeries, truncate: TimeDelta) -> Option<ChartSpec> {
    let cutoff = bz.truncation_cutoff(truncate)?;
    let truncated = bz.truncate_last(truncate);
    let first = truncated.first_time()?;

    Some(ChartSpec {
        title: format!("{} Bz", bz.date().format("%Y%m%d")),
        x_label: "Time [hours UT]".to_string(),
        x_range: hour_range(first.as_hours_f64(), cutoff.as_hours_f64()),
        x_tick_hours: 2,
        primary: AxisSpec {
            label: FIELD_AXIS_LABEL.to_string(),
            color: None,
            lines: vec![LineSpec::from_series(&truncated, SeriesColor::Blue)],
        },
        secondary: None,
        zero_line: true,
    })
}

/// Bz against solar wind speed over a fixed 0-24h axis.
///
/// Both sides keep their own timestamps; nothing is resampled. Needs data on
/// both sides.
pub fn bz_speed_chart(pair: &DualAxisSeries) -> Option<ChartSpec> {
    if pair.left().is_empty() || pair.right().is_empty() {
        return None;
    }

    Some(ChartSpec {
        title: format!("{} Bz and Solar Wind Speed", pair.date().format("%Y%m%d")),
        x_label: "Time [hours UTC]".to_string(),
        x_range: (0.0, 24.0),
        x_tick_hours: 2,
        primary: AxisSpec {
            label: FIELD_AXIS_LABEL.to_string(),
            color: Some(SeriesColor::StrongBlue),
            lines: vec![LineSpec::from_series(pair.left(), SeriesColor::StrongBlue)],
        },
        secondary: Some(AxisSpec {
            label: "Speed [km/s]".to_string(),
            color: Some(SeriesColor::StrongRed),
            lines: vec![LineSpec {
                label: "Speed".to_string(),
                ..LineSpec::from_series(pair.right(), SeriesColor::StrongRed)
            }],
        }),
        zero_line: true,
    })
}

/// Solar wind speed on its own, hourly ticks.
pub fn speed_chart(speed: &DailySeries) -> Option<ChartSpec> {
    let first = speed.first_time()?;
    let last = speed.last_time()?;

    Some(ChartSpec {
        title: format!("Solar Wind Speed on {}", speed.date().format("%Y%m%d")),
        x_label: "Time [UTC]".to_string(),
        x_range: hour_range(first.as_hours_f64(), last.as_hours_f64()),
        x_tick_hours: 1,
        primary: AxisSpec {
            label: format!("Solar Wind Speed [{}]", Quantity::Speed.unit()),
            color: None,
            lines: vec![LineSpec::from_series(speed, SeriesColor::Blue)],
        },
        secondary: None,
        zero_line: false,
    })
}

fn non_empty_lines<'a>(series: impl IntoIterator<Item = (&'a DailySeries, SeriesColor)>) -> Vec<LineSpec> {
    series
        .into_iter()
        .filter(|(s, _)| !s.is_empty())
        .map(|(s, color)| LineSpec::from_series(s, color))
        .collect()
}

/// Keep a degenerate (single-sample) range drawable.
fn hour_range(first: f64, last: f64) -> (f64, f64) {
    if last > first {
        (first, last)
    } else {
        ((first - 0.5).max(0.0), (last + 0.5).min(24.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::assemble_daily;
    use crate::series::tests::{day, full_day, obs};

    #[test]
    fn artifact_names() {
        let date = day(29);
        assert_eq!(ChartKind::BzBt.file_name(date), "20141029BzandBt.png");
        assert_eq!(ChartKind::TruncatedBz.file_name(date), "20141029_Bz.png");
        assert_eq!(ChartKind::BzSpeed.file_name(date), "20141029BzandSWSpeed.png");
        assert_eq!(ChartKind::Speed.file_name(date), "20141029_SWSpeed.png");
    }

    #[test]
    fn bz_bt_chart_spans_data() {
        let bz = full_day(day(29), Quantity::Bz);
        let bt = full_day(day(29), Quantity::Bt);
        let chart = bz_bt_chart(&bz, &bt).unwrap();
        assert_eq!(chart.title, "20141029 Bt and Bz");
        assert_eq!(chart.x_range.0, 0.0);
        assert!((chart.x_range.1 - 86_340.0 / 3600.0).abs() < 1e-12);
        let labels: Vec<&str> = chart.primary.lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, ["Bt", "Bz"]);
        assert!(chart.zero_line);
    }

    #[test]
    fn truncated_chart_ends_at_cutoff() {
        let bz = full_day(day(29), Quantity::Bz);
        let chart = truncated_bz_chart(&bz, TimeDelta::hours(8)).unwrap();
        assert_eq!(chart.title, "20141029 Bz");
        assert!((chart.x_range.1 - 57_540.0 / 3600.0).abs() < 1e-12);
        let last = chart.primary.lines[0].points.last().unwrap();
        assert!(last.0 <= chart.x_range.1);
    }

    #[test]
    fn truncated_chart_absent_when_nothing_left() {
        let bz = assemble_daily(&[obs(day(29), "0200", Quantity::Bz, 1.0)], day(29), Quantity::Bz);
        assert!(truncated_bz_chart(&bz, TimeDelta::hours(8)).is_none());
    }

    #[test]
    fn dual_axis_chart_uses_both_axes() {
        let bz = assemble_daily(
            &[obs(day(30), "0000", Quantity::Bz, -3.0), obs(day(30), "0001", Quantity::Bz, -4.0)],
            day(30),
            Quantity::Bz,
        );
        let speed = assemble_daily(&[obs(day(30), "0007", Quantity::Speed, 450.0)], day(30), Quantity::Speed);
        let pair = DualAxisSeries::new(bz, speed).unwrap();

        let chart = bz_speed_chart(&pair).unwrap();
        assert_eq!(chart.title, "20141030 Bz and Solar Wind Speed");
        assert_eq!(chart.x_range, (0.0, 24.0));
        assert_eq!(chart.primary.lines[0].points.len(), 2);
        let secondary = chart.secondary.unwrap();
        assert_eq!(secondary.lines[0].label, "Speed");
        assert_eq!(secondary.value_range(), Some((450.0, 450.0)));
    }

    #[test]
    fn empty_inputs_produce_no_chart() {
        let bz = DailySeries::empty(day(29), Quantity::Bz);
        let bt = DailySeries::empty(day(29), Quantity::Bt);
        assert!(bz_bt_chart(&bz, &bt).is_none());
        assert!(speed_chart(&DailySeries::empty(day(29), Quantity::Speed)).is_none());
        let pair = DualAxisSeries::new(bz, DailySeries::empty(day(29), Quantity::Speed)).unwrap();
        assert!(bz_speed_chart(&pair).is_none());

        let bz = assemble_daily(&[obs(day(29), "0000", Quantity::Bz, 1.0)], day(29), Quantity::Bz);
        let pair = DualAxisSeries::new(bz, DailySeries::empty(day(29), Quantity::Speed)).unwrap();
        assert!(bz_speed_chart(&pair).is_none());
    }

    #[test]
    fn single_sample_range_is_widened() {
        let speed = assemble_daily(&[obs(day(29), "1200", Quantity::Speed, 400.0)], day(29), Quantity::Speed);
        let chart = speed_chart(&speed).unwrap();
        assert_eq!(chart.x_range, (11.5, 12.5));
    }
}
