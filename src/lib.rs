//! `swx-plots` library crate.
//!
//! The binary (`swx`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes or touching the network
//! - the parser and series assembly can be reused on their own

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod series;
