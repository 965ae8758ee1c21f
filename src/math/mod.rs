//! Mathematical utilities: least squares, fit metrics, display scaling.

pub mod ols;
pub mod scale;

pub use ols::*;
pub use scale::*;
