use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use barstock_core::{ItemId, LocationId, Period};
use barstock_ledger::StockEvent;
use barstock_reports::{LedgerSource, StockLevel};

/// Append-only in-memory stock ledger.
///
/// Events keep their insertion order; point-in-time levels fold every event
/// strictly before the requested instant. Intended for tests/dev. Not
/// optimized for performance.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    events: RwLock<Vec<StockEvent>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: StockEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }

    /// Append a batch under one lock, e.g. the adjustments a closing
    /// session emits.
    pub fn record_all(&self, batch: Vec<StockEvent>) {
        if let Ok(mut events) = self.events.write() {
            events.extend(batch);
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LedgerSource for MemoryLedger {
    fn events_in_period(&self, location_id: LocationId, period: Period) -> Vec<StockEvent> {
        let events = match self.events.read() {
            Ok(e) => e,
            Err(_) => return vec![],
        };

        events
            .iter()
            .filter(|e| e.location_id() == location_id && period.contains(e.occurred_at()))
            .cloned()
            .collect()
    }

    fn stock_levels(&self, location_id: LocationId, as_of: DateTime<Utc>) -> Vec<StockLevel> {
        let events = match self.events.read() {
            Ok(e) => e,
            Err(_) => return vec![],
        };

        let mut levels: HashMap<ItemId, Decimal> = HashMap::new();
        for event in events.iter() {
            if event.location_id() == location_id && event.occurred_at() < as_of {
                *levels.entry(event.item_id()).or_default() += event.quantity_delta();
            }
        }
        levels
            .into_iter()
            .map(|(item_id, quantity)| StockLevel { item_id, quantity })
            .collect()
    }
}
