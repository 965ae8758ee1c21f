//! Reporting utilities: run summaries and per-month tables.

pub mod format;

pub use format::*;
