//! Reporting utilities: terminal summaries of runs and single-file parses.

mod format;

pub use format::{format_parse_summary, format_run_summary};
