//! abstats-core: statistical hypothesis testing and subscription metrics
//! over tabular datasets.
//!
//! The crate is built around [`frame::Frame`], a small typed table. The
//! [`tests`] module computes z-tests, t-tests, ANOVA (one/two/n-way),
//! proportion tests, and chi-square tests either from numeric summaries or
//! directly from a grouped frame. [`cleaning`] prepares a raw frame for
//! analysis and [`metrics`] derives churn rate, ARPU, and LTV from
//! subscription data.

pub mod cleaning;
pub mod diagnostics;
pub mod errors;
pub mod frame;
pub mod metrics;
pub mod tests;

pub use errors::{StatsError, StatsResult};
pub use frame::{ColumnType, Frame, Value};
