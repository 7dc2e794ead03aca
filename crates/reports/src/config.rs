//! Analysis tuning.
//!
//! A closed, enumerated structure: one field per rule kind with an explicit
//! enabled flag and threshold, validated at load time. Thresholds are never
//! read from open key/value maps.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult};

/// One detection rule: on/off plus its threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleToggle {
    pub enabled: bool,
    pub threshold: Decimal,
}

/// Thresholds for the pattern analyzer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Shrinkage flag: fraction of counted sessions that must show a
    /// variance. Threshold lies in [0, 1].
    pub shrinkage_recurrence: RuleToggle,
    /// Shrinkage flag: minimum cumulative loss magnitude. Threshold is in
    /// the item's base unit and must not be negative.
    pub shrinkage_loss: RuleToggle,
    /// Relative margin for trend classification, in [0, 1). A newer-half
    /// variance magnitude more than `1 + margin` times the older half reads
    /// as worsening, below `1 - margin` times as improving.
    pub trend_margin: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            shrinkage_recurrence: RuleToggle {
                enabled: true,
                threshold: dec!(0.5),
            },
            shrinkage_loss: RuleToggle {
                enabled: true,
                threshold: dec!(10),
            },
            trend_margin: dec!(0.15),
        }
    }
}

impl AnalysisConfig {
    /// Reject out-of-range thresholds. Values are never clamped.
    pub fn validate(&self) -> DomainResult<()> {
        let recurrence = self.shrinkage_recurrence.threshold;
        if recurrence < Decimal::ZERO || recurrence > Decimal::ONE {
            return Err(DomainError::validation(format!(
                "recurrence threshold must lie in [0, 1], got {recurrence}"
            )));
        }
        if self.shrinkage_loss.threshold < Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "loss threshold must not be negative, got {}",
                self.shrinkage_loss.threshold
            )));
        }
        if self.trend_margin < Decimal::ZERO || self.trend_margin >= Decimal::ONE {
            return Err(DomainError::validation(format!(
                "trend margin must lie in [0, 1), got {}",
                self.trend_margin
            )));
        }
        Ok(())
    }
}
