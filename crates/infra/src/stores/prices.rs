use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use tracing::debug;

use barstock_core::{DomainError, DomainResult, ItemId, PriceRecordId};
use barstock_pricing::{PriceEntry, PriceTimeline, ResolvedCost};
use barstock_reports::PriceSource;

/// Price timelines per item.
///
/// `append` validates the entry, closes the prior open record, and inserts
/// the new one while holding the write lock, so a reader never observes a
/// timeline with two open records.
#[derive(Debug, Default)]
pub struct MemoryPriceBook {
    timelines: RwLock<HashMap<ItemId, PriceTimeline>>,
}

impl MemoryPriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a price entry to the item's timeline, creating the timeline
    /// on first use.
    pub fn append(&self, item_id: ItemId, entry: PriceEntry) -> DomainResult<PriceRecordId> {
        let mut timelines = self
            .timelines
            .write()
            .map_err(|_| DomainError::conflict("price book lock poisoned"))?;

        let timeline = timelines
            .entry(item_id)
            .or_insert_with(|| PriceTimeline::new(item_id));
        let record_id = timeline.append(entry)?;
        debug!(%item_id, %record_id, "price record appended");
        Ok(record_id)
    }

    /// Owned snapshot of one item's timeline, for history views.
    pub fn timeline(&self, item_id: ItemId) -> Option<PriceTimeline> {
        let map = self.timelines.read().ok()?;
        map.get(&item_id).cloned()
    }
}

impl PriceSource for MemoryPriceBook {
    fn resolve_unit_cost(&self, item_id: ItemId, as_of: DateTime<Utc>) -> Option<ResolvedCost> {
        let map = self.timelines.read().ok()?;
        map.get(&item_id).and_then(|t| t.resolve(as_of))
    }
}
