//! Retrieval of ACE daily text files.
//!
//! The pipeline only depends on the [`Archive`] trait. Two implementations
//! ship with the crate:
//!
//! - [`AceClient`]: HTTP GET against the NOAA/SOHO daily archive
//! - [`LocalArchive`]: files already downloaded into a directory

use chrono::NaiveDate;

use crate::domain::DataProduct;

pub mod ace;
pub mod local;

pub use ace::AceClient;
pub use local::LocalArchive;

/// Outcome of fetching one daily file.
///
/// Any non-success is "no data for this date"; it never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Body(String),
    Unavailable {
        /// HTTP status when the server answered.
        status: Option<u16>,
        reason: String,
    },
}

impl FetchOutcome {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        FetchOutcome::Unavailable {
            status: None,
            reason: reason.into(),
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            FetchOutcome::Body(text) => Some(text),
            FetchOutcome::Unavailable { .. } => None,
        }
    }
}

/// Source of daily files, one per date and product.
pub trait Archive {
    fn fetch_daily(&self, date: NaiveDate, product: DataProduct) -> FetchOutcome;

    /// Short description for logs and summaries.
    fn describe(&self) -> String;
}
