//! Per-day series assembly.
//!
//! The parser emits a flat list of observations. This module groups them by
//! date (`ObservationBatch`), builds one ordered series per date and quantity
//! (`DailySeries`), and pairs two series for dual-axis charts (`align`).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::domain::{Observation, Quantity, RecordLayout, TimeOfDay};
use crate::io::ingest::{ParseStats, parse_file};

pub mod align;

pub use align::{AlignError, DualAxisSeries};

/// One sample of a daily series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: TimeOfDay,
    pub value: f64,
}

/// Ordered samples of one quantity on one calendar date.
///
/// Invariants: samples are strictly ascending by time-of-day (no duplicates)
/// and all belong to `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    date: NaiveDate,
    quantity: Quantity,
    samples: Vec<Sample>,
}

impl DailySeries {
    pub fn empty(date: NaiveDate, quantity: Quantity) -> Self {
        Self {
            date,
            quantity,
            samples: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first_time(&self) -> Option<TimeOfDay> {
        self.samples.first().map(|s| s.time)
    }

    pub fn last_time(&self) -> Option<TimeOfDay> {
        self.samples.last().map(|s| s.time)
    }

    /// `(min, max)` of the values, or `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.samples.iter().map(|s| s.value);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// `(fractional hour, value)` pairs for charting.
    pub fn hour_points(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|s| (s.time.as_hours_f64(), s.value))
            .collect()
    }

    /// `(UTC instant, value)` triples, fully formed for export/rendering.
    pub fn timestamped(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.samples.iter().map(|s| (s.time.on(self.date), s.value))
    }

    /// Drop the last `duration` of the series.
    ///
    /// Keeps the prefix whose times are all `<= last - duration`, measured from
    /// the actual last sample rather than midnight.
    pub fn truncate_last(&self, duration: TimeDelta) -> DailySeries {
        let samples = match self.truncation_cutoff(duration) {
            Some(cutoff) => self
                .samples
                .iter()
                .take_while(|s| s.time <= cutoff)
                .copied()
                .collect(),
            None => Vec::new(),
        };
        DailySeries {
            date: self.date,
            quantity: self.quantity,
            samples,
        }
    }

    /// The time `truncate_last(duration)` cuts at, when it lands inside the day.
    pub fn truncation_cutoff(&self, duration: TimeDelta) -> Option<TimeOfDay> {
        self.last_time()?.checked_sub(duration)
    }
}

/// Build the series for `date` and `quantity` from a flat observation list.
///
/// Observations for other dates or quantities are ignored. Samples are sorted
/// ascending; when several share a time-of-day, the first one in input order
/// wins.
pub fn assemble_daily(observations: &[Observation], date: NaiveDate, quantity: Quantity) -> DailySeries {
    let mut samples: Vec<Sample> = observations
        .iter()
        .filter(|o| o.date == date && o.quantity == quantity)
        .map(|o| Sample {
            time: o.time,
            value: o.value,
        })
        .collect();

    // Stable sort keeps input order among equal times; dedup keeps the first.
    samples.sort_by_key(|s| s.time);
    samples.dedup_by_key(|s| s.time);

    DailySeries {
        date,
        quantity,
        samples,
    }
}

/// Observations collected in one call, keyed by date.
///
/// Each call to the pipeline builds its own batch, so no state leaks from one
/// run (or one date) into another.
#[derive(Debug, Clone, Default)]
pub struct ObservationBatch {
    by_date: BTreeMap<NaiveDate, Vec<Observation>>,
}

impl ObservationBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a daily file and add its observations.
    pub fn ingest(&mut self, text: &str, date: NaiveDate, layout: &RecordLayout) -> ParseStats {
        let parsed = parse_file(text, date, layout);
        self.extend(parsed.observations);
        parsed.stats
    }

    pub fn extend(&mut self, observations: impl IntoIterator<Item = Observation>) {
        for obs in observations {
            self.by_date.entry(obs.date).or_default().push(obs);
        }
    }

    pub fn observations(&self, date: NaiveDate) -> &[Observation] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn daily(&self, date: NaiveDate, quantity: Quantity) -> DailySeries {
        assemble_daily(self.observations(date), date, quantity)
    }
}
