//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - produced by the record parser
//! - assembled into per-day series
//! - exported to CSV or handed to the chart renderer

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, TimeDelta};
use clap::ValueEnum;

use super::time::TimeOfDay;

/// A measured physical quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    /// North-south IMF component (GSM).
    Bz,
    /// Total IMF magnitude.
    Bt,
    /// Solar wind bulk speed.
    Speed,
}

impl Quantity {
    /// Human-readable label for charts and terminal output.
    pub fn label(self) -> &'static str {
        match self {
            Quantity::Bz => "Bz",
            Quantity::Bt => "Bt",
            Quantity::Speed => "Solar Wind Speed",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Bz | Quantity::Bt => "nT",
            Quantity::Speed => "km/s",
        }
    }

    /// Value the archive writes when no measurement exists.
    pub fn sentinel(self) -> f64 {
        match self {
            Quantity::Bz | Quantity::Bt => -999.9,
            Quantity::Speed => -9999.9,
        }
    }

    /// Short name used in file names and CSV exports.
    pub fn slug(self) -> &'static str {
        match self {
            Quantity::Bz => "Bz",
            Quantity::Bt => "Bt",
            Quantity::Speed => "SWSpeed",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A daily ACE text product in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum DataProduct {
    /// Magnetometer, 1-minute averages (`_ace_mag_1m.txt`).
    Mag,
    /// Solar wind electron/proton/alpha monitor, 1-minute averages (`_ace_swepam_1m.txt`).
    Swepam,
}

impl DataProduct {
    pub const ALL: [DataProduct; 2] = [DataProduct::Mag, DataProduct::Swepam];

    /// Archive file name for `date`.
    pub fn file_name(self, date: NaiveDate) -> String {
        let tag = match self {
            DataProduct::Mag => "mag",
            DataProduct::Swepam => "swepam",
        };
        format!("{}_ace_{tag}_1m.txt", date.format("%Y%m%d"))
    }

    /// Column layout of one data line.
    ///
    /// ACE columns: `YR MO DA HHMM MJD SECS S ...` followed by the product's
    /// measurements. Mag: `Bx By Bz Bt Lat Long`. Swepam: `Density Speed Temp`.
    pub fn layout(self) -> RecordLayout {
        match self {
            DataProduct::Mag => RecordLayout::hhmm(
                3,
                vec![FieldSpec::new(Quantity::Bz, 9), FieldSpec::new(Quantity::Bt, 10)],
            ),
            DataProduct::Swepam => RecordLayout::hhmm(3, vec![FieldSpec::new(Quantity::Speed, 8)]),
        }
    }

    pub fn quantities(self) -> &'static [Quantity] {
        match self {
            DataProduct::Mag => &[Quantity::Bz, Quantity::Bt],
            DataProduct::Swepam => &[Quantity::Speed],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DataProduct::Mag => "MAG",
            DataProduct::Swepam => "SWEPAM",
        }
    }
}

/// One measurement column of a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub quantity: Quantity,
    /// Zero-based whitespace-delimited field index.
    pub index: usize,
    /// Exact value meaning "no measurement".
    pub sentinel: f64,
}

impl FieldSpec {
    /// Field using the quantity's archive sentinel.
    pub fn new(quantity: Quantity, index: usize) -> Self {
        Self {
            quantity,
            index,
            sentinel: quantity.sentinel(),
        }
    }
}

/// Which fields of a line hold the `HHMM` time code and the measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLayout {
    pub time_field: usize,
    pub measurements: Vec<FieldSpec>,
}

impl RecordLayout {
    pub fn hhmm(time_field: usize, measurements: Vec<FieldSpec>) -> Self {
        Self {
            time_field,
            measurements,
        }
    }

    /// Minimum number of fields a line needs to be considered.
    pub fn required_fields(&self) -> usize {
        self.measurements
            .iter()
            .map(|m| m.index)
            .chain(std::iter::once(self.time_field))
            .max()
            .map_or(0, |max| max + 1)
    }
}

/// A single present measurement.
///
/// Sentinel ("missing") values never become an `Observation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub time: TimeOfDay,
    pub quantity: Quantity,
    pub value: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// First date to process (inclusive).
    pub start: NaiveDate,
    /// Last date to process (inclusive).
    pub end: NaiveDate,
    /// Directory that receives the PNG charts.
    pub out_dir: PathBuf,
    /// Read daily files from this directory instead of the remote archive.
    pub data_dir: Option<PathBuf>,
    /// Remote archive base URL (trailing slash optional).
    pub archive_url: String,
    /// How much of the tail the truncated Bz chart drops.
    pub truncate: TimeDelta,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Also save a standalone solar wind speed chart.
    pub speed_chart: bool,
    /// Write assembled series as CSV here.
    pub export_dir: Option<PathBuf>,
    /// Print an ASCII preview of each day's Bz to the terminal.
    pub preview: bool,
    pub preview_width: usize,
    pub preview_height: usize,
}

impl RunConfig {
    /// Every date in `[start, end]`, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_archive_convention() {
        let date = NaiveDate::from_ymd_opt(2014, 10, 29).unwrap();
        assert_eq!(DataProduct::Mag.file_name(date), "20141029_ace_mag_1m.txt");
        assert_eq!(DataProduct::Swepam.file_name(date), "20141029_ace_swepam_1m.txt");
    }

    #[test]
    fn required_fields_covers_highest_index() {
        assert_eq!(DataProduct::Mag.layout().required_fields(), 11);
        assert_eq!(DataProduct::Swepam.layout().required_fields(), 9);
        assert_eq!(RecordLayout::hhmm(5, vec![]).required_fields(), 6);
    }

    #[test]
    fn inclusive_date_range() {
        let config = RunConfig {
            start: NaiveDate::from_ymd_opt(2014, 10, 29).unwrap(),
            end: NaiveDate::from_ymd_opt(2014, 10, 31).unwrap(),
            out_dir: PathBuf::from("."),
            data_dir: None,
            archive_url: String::new(),
            truncate: TimeDelta::hours(8),
            chart_width: 100,
            chart_height: 60,
            speed_chart: false,
            export_dir: None,
            preview: false,
            preview_width: 80,
            preview_height: 20,
        };
        let dates: Vec<String> = config.dates().iter().map(|d| d.format("%Y%m%d").to_string()).collect();
        assert_eq!(dates, ["20141029", "20141030", "20141031"]);
    }
}
