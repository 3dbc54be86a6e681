//! Input/output helpers.
//!
//! - fixed-format record parsing + row accounting (`ingest`)
//! - CSV export of assembled series (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
