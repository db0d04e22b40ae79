//! Estimate calculation modules.
//!
//! This module provides the computation engine that resolves line amounts,
//! section subtotals and estimate totals, together with the rounding helpers
//! and the formula evaluator it is built on.

pub mod common;
pub mod engine;
pub mod formula;
pub mod subtotals;
pub mod warning;

pub use engine::{
    EstimateCalculator, EstimateConfig, EstimateConfigError, EstimateResult, compute,
};
pub use formula::{Formula, OVERHEAD_FORMULA, PROFIT_FORMULA};
pub use subtotals::SectionSubtotals;
pub use warning::{CalculationWarning, LineRef};
