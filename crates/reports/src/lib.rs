//! Reporting module (variance, COGS, usage, shrinkage patterns).
//!
//! Pure computation over read-side traits: no IO, no persistence concerns.
//! Stores plug in through [`sources`]; [`engine::ReportEngine`] bundles
//! them behind one handle.

pub mod cogs;
pub mod config;
pub mod engine;
pub mod patterns;
pub mod sources;
pub mod usage;
pub mod variance;

#[cfg(test)]
mod fixtures;

pub use cogs::{CogsReport, PurchaseLine, cogs_report};
pub use config::{AnalysisConfig, RuleToggle};
pub use engine::ReportEngine;
pub use patterns::{
    MAX_SESSION_COUNT, MIN_SESSION_COUNT, PatternSortKey, VariancePatternRow, VarianceTrend,
    pattern_report, sort_rows,
};
pub use sources::{CatalogSource, LedgerSource, PriceSource, SessionSource, StockLevel};
pub use usage::{UsageLine, UsageReport, usage_report};
pub use variance::{ItemVariance, item_variance, variance_report};
