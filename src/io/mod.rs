//! Input/output helpers.
//!
//! - dataset CSV loading (`dataset`)
//! - series exports (CSV/JSON) (`export`)

pub mod dataset;
pub mod export;

pub use dataset::*;
pub use export::*;
