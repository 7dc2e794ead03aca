//! Effective-dated price history.
//!
//! Each item carries a timeline of cost records over half-open intervals
//! `[effective_from, effective_to)`. Appending a price closes the previous
//! open interval at the new record's `effective_from`, so the timeline is
//! gapless from the first entry onward and at most one record is open.
//! Records are never deleted, only superseded.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult, ItemId, PriceRecordId};

/// ISO 4217 currency of a recorded cost.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

/// How the operator entered a price.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    PerUnit,
    PerContainer,
}

/// Cost terms as captured from the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entry_mode", rename_all = "snake_case")]
pub enum PriceTerms {
    /// Cost stated directly per base unit.
    PerUnit { unit_cost: Decimal },
    /// Cost stated per container (e.g. one keg); the per-unit cost is
    /// derived by dividing by the container's size in base units.
    PerContainer {
        container_cost: Decimal,
        container_size_base_units: Decimal,
    },
}

impl PriceTerms {
    pub fn mode(&self) -> EntryMode {
        match self {
            PriceTerms::PerUnit { .. } => EntryMode::PerUnit,
            PriceTerms::PerContainer { .. } => EntryMode::PerContainer,
        }
    }
}

/// Command: append a price to an item's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub terms: PriceTerms,
    pub currency: Currency,
    pub effective_from: DateTime<Utc>,
}

/// One persisted price record.
///
/// `unit_cost` is always the per-base-unit cost; for `per_container`
/// entries the original container fields are retained for display while
/// all downstream costing uses the derived per-unit value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceHistoryRecord {
    pub id: PriceRecordId,
    pub item_id: ItemId,
    pub unit_cost: Decimal,
    pub entry_mode: EntryMode,
    pub container_cost: Option<Decimal>,
    pub container_size_base_units: Option<Decimal>,
    pub currency: Currency,
    /// Inclusive start of validity.
    pub effective_from: DateTime<Utc>,
    /// Exclusive end of validity; `None` while the record is current.
    pub effective_to: Option<DateTime<Utc>>,
}

impl PriceHistoryRecord {
    /// Whether this record's interval contains `as_of`.
    pub fn covers(&self, as_of: DateTime<Utc>) -> bool {
        self.effective_from <= as_of && self.effective_to.map_or(true, |to| as_of < to)
    }

    pub fn is_open(&self) -> bool {
        self.effective_to.is_none()
    }
}

/// A unit cost resolved at a point in time, with the record it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCost {
    pub unit_cost: Decimal,
    pub currency: Currency,
    pub record_id: PriceRecordId,
    pub effective_from: DateTime<Utc>,
}

/// One item's price records in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTimeline {
    item_id: ItemId,
    records: Vec<PriceHistoryRecord>,
}

impl PriceTimeline {
    pub fn new(item_id: ItemId) -> Self {
        Self {
            item_id,
            records: Vec::new(),
        }
    }

    /// Rebuild a timeline from persisted records, trusting their intervals.
    /// Resolution stays defensive in case the persisted data is corrupt.
    pub fn from_records(item_id: ItemId, records: Vec<PriceHistoryRecord>) -> Self {
        Self { item_id, records }
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn records(&self) -> &[PriceHistoryRecord] {
        &self.records
    }

    pub fn open_record(&self) -> Option<&PriceHistoryRecord> {
        self.records.iter().find(|r| r.is_open())
    }

    /// Append a price entry, closing the prior open record.
    ///
    /// For `per_container` terms the per-unit cost is derived as
    /// `container_cost / container_size_base_units`. The prior open record
    /// (if any) gets `effective_to = entry.effective_from` in the same
    /// step, preserving the non-overlap invariant. An `effective_from`
    /// earlier than the open record's is a conflict.
    pub fn append(&mut self, entry: PriceEntry) -> DomainResult<PriceRecordId> {
        let (unit_cost, container_cost, container_size) = match entry.terms {
            PriceTerms::PerUnit { unit_cost } => {
                if unit_cost < Decimal::ZERO {
                    return Err(DomainError::validation(format!(
                        "unit cost must not be negative, got {unit_cost}"
                    )));
                }
                (unit_cost, None, None)
            }
            PriceTerms::PerContainer {
                container_cost,
                container_size_base_units,
            } => {
                if container_cost < Decimal::ZERO {
                    return Err(DomainError::validation(format!(
                        "container cost must not be negative, got {container_cost}"
                    )));
                }
                if container_size_base_units <= Decimal::ZERO {
                    return Err(DomainError::validation(format!(
                        "container size must be positive, got {container_size_base_units}"
                    )));
                }
                (
                    container_cost / container_size_base_units,
                    Some(container_cost),
                    Some(container_size_base_units),
                )
            }
        };

        if let Some(open) = self.open_record() {
            if entry.effective_from < open.effective_from {
                return Err(DomainError::conflict(format!(
                    "price effective {} predates the current open record ({})",
                    entry.effective_from, open.effective_from
                )));
            }
        }

        let id = PriceRecordId::new();
        let record = PriceHistoryRecord {
            id,
            item_id: self.item_id,
            unit_cost,
            entry_mode: entry.terms.mode(),
            container_cost,
            container_size_base_units: container_size,
            currency: entry.currency,
            effective_from: entry.effective_from,
            effective_to: None,
        };

        if let Some(open) = self.records.iter_mut().find(|r| r.is_open()) {
            open.effective_to = Some(entry.effective_from);
        }
        self.records.push(record);
        Ok(id)
    }

    /// Resolve the unit cost applicable at `as_of`.
    ///
    /// Returns `None` when `as_of` predates the first record. If corrupt
    /// data makes more than one interval match, the most recently inserted
    /// record wins and a data-integrity warning is logged; this never
    /// surfaces as an error.
    pub fn resolve(&self, as_of: DateTime<Utc>) -> Option<ResolvedCost> {
        let mut matched: Option<&PriceHistoryRecord> = None;
        let mut matches = 0usize;
        for record in &self.records {
            if record.covers(as_of) {
                matched = Some(record);
                matches += 1;
            }
        }
        if matches > 1 {
            tracing::warn!(
                item_id = %self.item_id,
                %as_of,
                matches,
                "overlapping price intervals, preferring most recently inserted record"
            );
        }
        matched.map(|record| ResolvedCost {
            unit_cost: record.unit_cost,
            currency: record.currency,
            record_id: record.id,
            effective_from: record.effective_from,
        })
    }
}
