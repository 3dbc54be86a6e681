//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - time-of-day decoding for `HHMM` codes (`TimeOfDay`)
//! - archive products, quantities and record layouts (`DataProduct`, `Quantity`, `RecordLayout`)
//! - parsed observations (`Observation`) and the run configuration (`RunConfig`)

pub mod time;
pub mod types;

pub use time::*;
pub use types::*;
