//! Counting sessions and the reconciliation events they emit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult, ItemId, LocationId, SessionId, Uom};

use crate::event::{Adjustment, EventSource, StockEvent};

/// One counted item within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLine {
    pub item_id: ItemId,
    /// What the ledger says should remain, in the item's base unit.
    pub theoretical_qty: Decimal,
    /// What the physical count found.
    pub actual_qty: Decimal,
    pub uom: Uom,
}

impl SessionLine {
    /// Signed count variance. Negative means less on hand than expected.
    pub fn variance(&self) -> Decimal {
        self.actual_qty - self.theoretical_qty
    }
}

/// A bounded-time physical count.
///
/// Open sessions accumulate one line per item; closing freezes the session
/// and emits one ledger adjustment per line whose variance is non-zero,
/// reconciling the ledger to the counted value. Closed sessions are
/// immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountingSession {
    id: SessionId,
    location_id: LocationId,
    opened_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    lines: Vec<SessionLine>,
}

impl CountingSession {
    pub fn open(id: SessionId, location_id: LocationId, opened_at: DateTime<Utc>) -> Self {
        Self {
            id,
            location_id,
            opened_at,
            closed_at: None,
            lines: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn location_id(&self) -> LocationId {
        self.location_id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    pub fn lines(&self) -> &[SessionLine] {
        &self.lines
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    /// Variance recorded for one item, if it was counted in this session.
    pub fn line_for(&self, item_id: ItemId) -> Option<&SessionLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    /// Record a counted line. Each item may appear at most once per session.
    pub fn record_line(&mut self, line: SessionLine) -> DomainResult<()> {
        if self.is_closed() {
            return Err(DomainError::conflict(
                "cannot add lines to a closed session",
            ));
        }
        if self.line_for(line.item_id).is_some() {
            return Err(DomainError::conflict(format!(
                "item {} already counted in this session",
                line.item_id
            )));
        }
        self.lines.push(line);
        Ok(())
    }

    /// Close the session.
    ///
    /// Emits one adjustment per line with non-zero variance; the adjustment
    /// delta is exactly the variance, so applying it brings the ledger to
    /// the counted quantity. Closing twice is a conflict.
    pub fn close(mut self, closed_at: DateTime<Utc>) -> DomainResult<(Self, Vec<StockEvent>)> {
        if self.is_closed() {
            return Err(DomainError::conflict("session already closed"));
        }
        if closed_at < self.opened_at {
            return Err(DomainError::validation(format!(
                "close time {closed_at} precedes open time {}",
                self.opened_at
            )));
        }

        let adjustments: Vec<StockEvent> = self
            .lines
            .iter()
            .filter(|line| !line.variance().is_zero())
            .map(|line| {
                StockEvent::Adjustment(Adjustment {
                    location_id: self.location_id,
                    item_id: line.item_id,
                    quantity_delta: line.variance(),
                    uom: line.uom,
                    occurred_at: closed_at,
                    source: EventSource::CountApp,
                    session_id: Some(self.id),
                })
            })
            .collect();

        self.closed_at = Some(closed_at);
        Ok((self, adjustments))
    }
}
