//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - picks the archive (remote or local directory)
//! - runs the per-date pipeline
//! - prints the summary

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, TimeDelta};
use clap::Parser;

use crate::cli::{ChartArgs, Command, ParseArgs, PlotArgs, RunArgs};
use crate::data::{AceClient, Archive, LocalArchive};
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::plot::PngRenderer;

pub mod pipeline;

const PREVIEW_WIDTH: usize = 96;
const PREVIEW_HEIGHT: usize = 16;

/// Entry point for the `swx` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` first so `RUST_LOG` and `SWX_ARCHIVE_URL` set there apply to every command.
    load_dotenv(None);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // We want `swx` and `swx --start ...` to behave like `swx run ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Plot(args) => handle_plot(args),
        Command::Parse(args) => handle_parse(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let archive: Box<dyn Archive> = match &config.data_dir {
        Some(dir) => Box::new(LocalArchive::new(dir)),
        None => Box::new(AceClient::new(config.archive_url.clone())),
    };
    execute(&config, archive.as_ref())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = config_from_chart_args(args.date, args.date, Some(args.data_dir.clone()), String::new(), &args.chart);
    let archive = LocalArchive::new(&args.data_dir);
    execute(&config, &archive)
}

fn execute(config: &RunConfig, archive: &dyn Archive) -> Result<(), AppError> {
    let renderer = PngRenderer::new(config.chart_width, config.chart_height);
    let run = pipeline::run_range(config, archive, &renderer)?;

    println!("{}", crate::report::format_run_summary(&run));

    if !run.retrieved_any() {
        return Err(AppError::new(
            3,
            format!("No data retrieved for {} .. {} from {}", config.start, config.end, archive.describe()),
        ));
    }
    Ok(())
}

fn handle_parse(args: ParseArgs) -> Result<(), AppError> {
    let date = match args.date.or_else(|| crate::cli::date_from_file_name(&args.file)) {
        Some(date) => date,
        None => {
            return Err(AppError::new(
                2,
                format!(
                    "Cannot infer the date of '{}'; pass --date YYYYMMDD.",
                    args.file.display()
                ),
            ));
        }
    };

    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", args.file.display())))?;
    let parsed = crate::io::ingest::parse_file(&text, date, &args.product.layout());

    println!(
        "{}",
        crate::report::format_parse_summary(&args.file, args.product, date, &parsed, args.errors)
    );

    if args.preview {
        for &quantity in args.product.quantities() {
            let series = crate::series::assemble_daily(&parsed.observations, date, quantity);
            println!(
                "{}",
                crate::plot::render_ascii_series(&series, args.preview_width, args.preview_height)
            );
        }
    }
    Ok(())
}

/// Load `.env` (or `path`) into the process environment, keeping variables
/// that are already set.
fn load_dotenv(path: Option<&Path>) {
    let loaded = match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    if let Err(e) = loaded {
        if !e.not_found() {
            eprintln!("warning: failed to load .env: {e}");
        }
    }
}

/// Build the pipeline config for `swx run`.
pub fn run_config_from_args(args: &RunArgs) -> Result<RunConfig, AppError> {
    if args.end < args.start {
        return Err(AppError::new(
            2,
            format!("--end ({}) is before --start ({})", args.end, args.start),
        ));
    }
    Ok(config_from_chart_args(
        args.start,
        args.end,
        args.data_dir.clone(),
        AceClient::archive_url_from_env(),
        &args.chart,
    ))
}

fn config_from_chart_args(
    start: NaiveDate,
    end: NaiveDate,
    data_dir: Option<PathBuf>,
    archive_url: String,
    chart: &ChartArgs,
) -> RunConfig {
    RunConfig {
        start,
        end,
        out_dir: chart.out_dir.clone(),
        data_dir,
        archive_url,
        truncate: TimeDelta::hours(i64::from(chart.truncate_hours)),
        chart_width: chart.width,
        chart_height: chart.height,
        speed_chart: chart.speed_chart,
        export_dir: chart.export_dir.clone(),
        preview: chart.preview,
        preview_width: PREVIEW_WIDTH,
        preview_height: PREVIEW_HEIGHT,
    }
}

/// Rewrite argv so `swx` defaults to `swx run`.
///
/// Rules:
/// - `swx`                      -> `swx run`
/// - `swx --start 20141029 ...` -> `swx run --start 20141029 ...`
/// - `swx --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "plot" | "parse");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    argv
}
