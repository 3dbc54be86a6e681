//! Fixed-format record parsing.
//!
//! This module is responsible for turning the text body of an ACE daily file
//! into a clean set of `Observation`s that are safe to plot.
//!
//! Design goals:
//! - **Never fail on input**: a bad line is a value (`LineOutcome::Rejected`), not an error
//! - **Row-level accounting**: skip counts and reasons are kept per file
//! - **Deterministic behavior**: output order follows input order
//! - **Separation of concerns**: no sorting/assembly logic here (see `series`)

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;

use crate::domain::{Observation, RecordLayout, TimeOfDay};

/// Why a line was not turned into observations.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    TooFewFields { found: usize, required: usize },
    InvalidTimeCode(String),
    NonNumeric { index: usize, raw: String },
}

impl Rejection {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Rejection::TooFewFields { .. } => RejectionKind::TooFewFields,
            Rejection::InvalidTimeCode(_) => RejectionKind::InvalidTimeCode,
            Rejection::NonNumeric { .. } => RejectionKind::NonNumeric,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooFewFields { found, required } => {
                write!(f, "too few fields ({found} < {required})")
            }
            Rejection::InvalidTimeCode(raw) => write!(f, "invalid time code '{raw}'"),
            Rejection::NonNumeric { index, raw } => write!(f, "field {index} is not numeric: '{raw}'"),
        }
    }
}

/// Rejection reason without its payload (used as a counter key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectionKind {
    TooFewFields,
    InvalidTimeCode,
    NonNumeric,
}

impl RejectionKind {
    pub fn display_name(self) -> &'static str {
        match self {
            RejectionKind::TooFewFields => "too few fields",
            RejectionKind::InvalidTimeCode => "invalid time code",
            RejectionKind::NonNumeric => "non-numeric field",
        }
    }
}

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// A data record. `absent` counts measurement fields that held the sentinel.
    Parsed {
        observations: Vec<Observation>,
        absent: usize,
    },
    /// A malformed record.
    Rejected(Rejection),
    /// Blank line or archive header/comment (`#` / `:` prefixed).
    Ignored,
}

/// Per-file parse accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub parsed: usize,
    pub ignored: usize,
    /// Measurement fields skipped because they held the sentinel.
    pub absent: usize,
    pub rejected: BTreeMap<RejectionKind, usize>,
}

impl ParseStats {
    pub fn rejected_total(&self) -> usize {
        self.rejected.values().sum()
    }

    pub fn rejected_for(&self, kind: RejectionKind) -> usize {
        self.rejected.get(&kind).copied().unwrap_or(0)
    }

    pub fn record(&mut self, outcome: &LineOutcome) {
        self.lines += 1;
        match outcome {
            LineOutcome::Parsed { absent, .. } => {
                self.parsed += 1;
                self.absent += absent;
            }
            LineOutcome::Rejected(reason) => {
                *self.rejected.entry(reason.kind()).or_insert(0) += 1;
            }
            LineOutcome::Ignored => self.ignored += 1,
        }
    }

    pub fn merge(&mut self, other: &ParseStats) {
        self.lines += other.lines;
        self.parsed += other.parsed;
        self.ignored += other.ignored;
        self.absent += other.absent;
        for (kind, n) in &other.rejected {
            *self.rejected.entry(*kind).or_insert(0) += n;
        }
    }
}

/// A rejected line, kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// 1-based line number in the file.
    pub line: usize,
    pub reason: Rejection,
}

/// Parse output for one daily file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub observations: Vec<Observation>,
    pub stats: ParseStats,
    pub row_errors: Vec<RowError>,
}

/// Parse one line of a daily file dated `date`.
pub fn parse_line(line: &str, date: NaiveDate, layout: &RecordLayout) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(':') {
        return LineOutcome::Ignored;
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let required = layout.required_fields();
    if fields.len() < required {
        return LineOutcome::Rejected(Rejection::TooFewFields {
            found: fields.len(),
            required,
        });
    }

    let raw_time = fields[layout.time_field];
    let Some(time) = TimeOfDay::from_hhmm(raw_time) else {
        return LineOutcome::Rejected(Rejection::InvalidTimeCode(raw_time.to_string()));
    };

    // Validate every measurement before emitting any, so a record is either
    // fully accepted or fully rejected.
    let mut values = Vec::with_capacity(layout.measurements.len());
    for spec in &layout.measurements {
        let raw = fields[spec.index];
        match parse_measurement(raw) {
            Some(v) => values.push((spec, v)),
            None => {
                return LineOutcome::Rejected(Rejection::NonNumeric {
                    index: spec.index,
                    raw: raw.to_string(),
                });
            }
        }
    }

    let mut observations = Vec::with_capacity(values.len());
    let mut absent = 0;
    for (spec, value) in values {
        if value == spec.sentinel {
            absent += 1;
            continue;
        }
        observations.push(Observation {
            date,
            time,
            quantity: spec.quantity,
            value,
        });
    }

    LineOutcome::Parsed { observations, absent }
}

/// Parse the full text body of a daily file dated `date`.
pub fn parse_file(text: &str, date: NaiveDate, layout: &RecordLayout) -> ParsedFile {
    let mut out = ParsedFile::default();

    for (idx, line) in text.lines().enumerate() {
        let outcome = parse_line(line, date, layout);
        out.stats.record(&outcome);
        match outcome {
            LineOutcome::Parsed { observations, .. } => out.observations.extend(observations),
            LineOutcome::Rejected(reason) => {
                log::debug!("{date}: line {} skipped: {reason}", idx + 1);
                out.row_errors.push(RowError { line: idx + 1, reason });
            }
            LineOutcome::Ignored => {}
        }
    }

    out
}

fn parse_measurement(raw: &str) -> Option<f64> {
    let v = raw.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
