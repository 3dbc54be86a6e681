//! Pairing two independently sampled series for a dual-axis chart.
//!
//! Each side keeps its own native timestamps. Nothing is interpolated or
//! resampled, so the two curves are generally not point-aligned; they only
//! share a time origin (midnight UTC of the same date).

use std::fmt;

use chrono::NaiveDate;

use super::DailySeries;
use crate::domain::TimeOfDay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    DateMismatch { left: NaiveDate, right: NaiveDate },
}

impl fmt::Display for AlignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignError::DateMismatch { left, right } => {
                write!(f, "cannot align series from different dates ({left} vs {right})")
            }
        }
    }
}

impl std::error::Error for AlignError {}

/// Two series of the same date, plotted against a shared time axis.
#[derive(Debug, Clone, PartialEq)]
pub struct DualAxisSeries {
    left: DailySeries,
    right: DailySeries,
}

impl DualAxisSeries {
    pub fn new(left: DailySeries, right: DailySeries) -> Result<Self, AlignError> {
        if left.date() != right.date() {
            return Err(AlignError::DateMismatch {
                left: left.date(),
                right: right.date(),
            });
        }
        Ok(Self { left, right })
    }

    pub fn date(&self) -> NaiveDate {
        self.left.date()
    }

    pub fn left(&self) -> &DailySeries {
        &self.left
    }

    pub fn right(&self) -> &DailySeries {
        &self.right
    }

    /// Earliest and latest sample time across both sides.
    pub fn time_span(&self) -> Option<(TimeOfDay, TimeOfDay)> {
        let first = [self.left.first_time(), self.right.first_time()]
            .into_iter()
            .flatten()
            .min()?;
        let last = [self.left.last_time(), self.right.last_time()]
            .into_iter()
            .flatten()
            .max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Quantity;
    use crate::series::assemble_daily;
    use crate::series::tests::{day, obs};

    #[test]
    fn keeps_native_timestamps() {
        let bz = assemble_daily(
            &[
                obs(day(29), "0000", Quantity::Bz, -1.0),
                obs(day(29), "0001", Quantity::Bz, -2.0),
                obs(day(29), "0002", Quantity::Bz, -3.0),
            ],
            day(29),
            Quantity::Bz,
        );
        let speed = assemble_daily(
            &[
                obs(day(29), "0005", Quantity::Speed, 410.0),
                obs(day(29), "0017", Quantity::Speed, 420.0),
            ],
            day(29),
            Quantity::Speed,
        );

        let pair = DualAxisSeries::new(bz.clone(), speed.clone()).unwrap();
        assert_eq!(pair.left(), &bz);
        assert_eq!(pair.right(), &speed);
        assert_eq!(pair.left().len(), 3);
        assert_eq!(pair.right().len(), 2);

        let (first, last) = pair.time_span().unwrap();
        assert_eq!(first.to_hhmm(), "0000");
        assert_eq!(last.to_hhmm(), "0017");
    }

    #[test]
    fn rejects_mixed_dates() {
        let left = assemble_daily(&[obs(day(29), "0000", Quantity::Bz, 1.0)], day(29), Quantity::Bz);
        let right = assemble_daily(&[obs(day(30), "0000", Quantity::Speed, 1.0)], day(30), Quantity::Speed);
        assert_eq!(
            DualAxisSeries::new(left, right).unwrap_err(),
            AlignError::DateMismatch {
                left: day(29),
                right: day(30)
            }
        );
    }

    #[test]
    fn empty_side_still_has_span() {
        let left = assemble_daily(&[obs(day(29), "0300", Quantity::Bz, 1.0)], day(29), Quantity::Bz);
        let right = DailySeries::empty(day(29), Quantity::Speed);
        let pair = DualAxisSeries::new(left, right).unwrap();
        let (first, last) = pair.time_span().unwrap();
        assert_eq!(first, last);

        let none = DualAxisSeries::new(
            DailySeries::empty(day(29), Quantity::Bz),
            DailySeries::empty(day(29), Quantity::Speed),
        )
        .unwrap();
        assert!(none.time_span().is_none());
    }
}
