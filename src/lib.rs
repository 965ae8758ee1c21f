//! `csi-trends` library crate.
//!
//! The binary (`csi`) is a thin wrapper around this library so that:
//!
//! - the month join, index and gap-fill logic is testable without spawning processes
//! - the query layer can feed any renderer (ASCII, TUI, exports)

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod extract;
pub mod index;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod predict;
pub mod query;
pub mod report;
pub mod series;
pub mod tui;
