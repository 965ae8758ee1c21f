//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the joined monthly record (`Month`) and its baskets (`Basket`)
//! - plottable categories and fill strategies (`Category`, `FillStrategy`)
//! - run configuration (`SeriesConfig`)
//! - month arithmetic helpers (`calendar`)

pub mod calendar;
pub mod types;

pub use types::*;
