//! Command-line parsing for the ACE daily plotter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from parsing/plotting code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::DataProduct;
use crate::plot::png::{MAX_CHART_SIDE, MIN_CHART_SIDE};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "swx", version, about = "ACE solar wind and IMF daily charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Retrieve a date range from the ACE archive and save the daily charts.
    Run(RunArgs),
    /// Render the charts for one date from daily files already on disk.
    Plot(PlotArgs),
    /// Parse a single daily file and report what was accepted/rejected.
    Parse(ParseArgs),
}

/// Chart output options shared by `run` and `plot`.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Directory that receives the PNG charts.
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Hours dropped from the end of the truncated Bz chart.
    #[arg(long, default_value_t = 8)]
    pub truncate_hours: u32,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1200, value_parser = chart_side_parser())]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 700, value_parser = chart_side_parser())]
    pub height: u32,

    /// Also save a standalone solar wind speed chart.
    #[arg(long)]
    pub speed_chart: bool,

    /// Write assembled series as CSV into this directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Print an ASCII preview of each day's Bz.
    #[arg(long)]
    pub preview: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// First date (YYYYMMDD or YYYY-MM-DD).
    #[arg(short = 's', long, value_parser = parse_date_arg, default_value = "20141029")]
    pub start: NaiveDate,

    /// Last date, inclusive.
    #[arg(short = 'e', long, value_parser = parse_date_arg, default_value = "20141031")]
    pub end: NaiveDate,

    /// Read daily files from this directory instead of the remote archive.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(flatten)]
    pub chart: ChartArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct PlotArgs {
    /// Date to plot (YYYYMMDD or YYYY-MM-DD).
    #[arg(value_parser = parse_date_arg)]
    pub date: NaiveDate,

    /// Directory holding `{date}_ace_mag_1m.txt` / `{date}_ace_swepam_1m.txt`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub chart: ChartArgs,
}

#[derive(Debug, Parser, Clone)]
pub struct ParseArgs {
    /// Daily ACE text file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Which product layout to apply.
    #[arg(short = 'p', long, value_enum, default_value_t = DataProduct::Mag)]
    pub product: DataProduct,

    /// Date of the file; taken from a leading YYYYMMDD in the file name if omitted.
    #[arg(short = 'd', long, value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// How many rejected lines to list.
    #[arg(long, default_value_t = 10)]
    pub errors: usize,

    /// Print an ASCII preview of every parsed quantity.
    #[arg(long)]
    pub preview: bool,

    /// Preview width (columns).
    #[arg(long, default_value_t = 96)]
    pub preview_width: usize,

    /// Preview height (rows).
    #[arg(long, default_value_t = 16)]
    pub preview_height: usize,
}

fn chart_side_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(i64::from(MIN_CHART_SIDE)..=i64::from(MAX_CHART_SIDE))
}

/// Accepts `20141029` or `2014-10-29`.
pub fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{raw}' (expected YYYYMMDD or YYYY-MM-DD)"))
}

/// Date encoded in an archive file name such as `20141029_ace_mag_1m.txt`.
pub fn date_from_file_name(path: &std::path::Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let prefix = name.get(..8)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(prefix, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn date_args_accept_both_forms() {
        let expected = NaiveDate::from_ymd_opt(2014, 10, 29).unwrap();
        assert_eq!(parse_date_arg("20141029"), Ok(expected));
        assert_eq!(parse_date_arg("2014-10-29"), Ok(expected));
        assert!(parse_date_arg("20141332").is_err());
        assert!(parse_date_arg("yesterday").is_err());
    }

    #[test]
    fn date_from_archive_file_name() {
        assert_eq!(
            date_from_file_name(Path::new("data/20141030_ace_swepam_1m.txt")),
            NaiveDate::from_ymd_opt(2014, 10, 30)
        );
        assert_eq!(date_from_file_name(Path::new("mag.txt")), None);
    }

    #[test]
    fn run_defaults() {
        let cli = Cli::parse_from(["swx", "run"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2014, 10, 29).unwrap());
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2014, 10, 31).unwrap());
        assert_eq!(args.chart.truncate_hours, 8);
        assert!(args.data_dir.is_none());
        assert!(!args.chart.speed_chart);
    }

    #[test]
    fn chart_size_is_bounded() {
        let cli = Cli::parse_from(["swx", "run", "--width", "800", "--height", "8000"]);
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!((args.chart.width, args.chart.height), (800, 8000));

        assert!(Cli::try_parse_from(["swx", "run", "--width", "100000", "--height", "100000"]).is_err());
        assert!(Cli::try_parse_from(["swx", "plot", "20141029", "--height", "8001"]).is_err());
        assert!(Cli::try_parse_from(["swx", "run", "--width", "10"]).is_err());
    }

    #[test]
    fn parse_flags() {
        let cli = Cli::parse_from(["swx", "parse", "x.txt", "-p", "swepam", "-d", "2014-10-31"]);
        let Command::Parse(args) = cli.command else {
            panic!("expected parse");
        };
        assert_eq!(args.product, DataProduct::Swepam);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2014, 10, 31));
    }
}
