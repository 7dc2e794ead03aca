//! In-memory fakes and builders shared by the report module tests.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use barstock_catalog::{BottleTemplate, Category, InventoryItem, KegSize};
use barstock_core::{CategoryId, ItemId, LocationId, Period, SessionId, Uom};
use barstock_ledger::{
    Adjustment, Consumption, CountingSession, EventSource, Receipt, SessionLine, StockEvent,
};
use barstock_pricing::{Currency, PriceEntry, PriceTerms, PriceTimeline, ResolvedCost};

use crate::sources::{CatalogSource, LedgerSource, PriceSource, SessionSource, StockLevel};

pub fn test_location() -> LocationId {
    LocationId::new()
}

pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub fn period(from_day: u32, to_day: u32) -> Period {
    Period::new(ts(from_day, 0), ts(to_day, 0)).unwrap()
}

pub fn test_item(location_id: LocationId, name: &str) -> InventoryItem {
    InventoryItem {
        id: ItemId::new(),
        location_id,
        name: name.into(),
        category_id: CategoryId::new(),
        base_uom: Uom::Ml,
        container_size: None,
        container_uom: None,
        pack_size: None,
    }
}

/// A session opened at 09:00 and closed at 11:00 on `day`, with one line
/// per `(item, theoretical, actual)` triple.
pub fn closed_session(
    location_id: LocationId,
    day: u32,
    lines: &[(ItemId, Decimal, Decimal)],
) -> CountingSession {
    let mut session = CountingSession::open(SessionId::new(), location_id, ts(day, 9));
    for (item_id, theoretical, actual) in lines {
        session
            .record_line(SessionLine {
                item_id: *item_id,
                theoretical_qty: *theoretical,
                actual_qty: *actual,
                uom: Uom::Ml,
            })
            .unwrap();
    }
    let (closed, _) = session.close(ts(day, 11)).unwrap();
    closed
}

pub fn consumption(
    location_id: LocationId,
    item_id: ItemId,
    delta: Decimal,
    day: u32,
    hour: u32,
) -> StockEvent {
    StockEvent::Consumption(Consumption {
        location_id,
        item_id,
        quantity_delta: delta,
        uom: Uom::Ml,
        occurred_at: ts(day, hour),
        source: EventSource::Pos,
    })
}

pub fn receipt(
    location_id: LocationId,
    item_id: ItemId,
    quantity: Decimal,
    day: u32,
    hour: u32,
) -> StockEvent {
    StockEvent::Receipt(Receipt {
        location_id,
        item_id,
        quantity_delta: quantity,
        uom: Uom::Ml,
        occurred_at: ts(day, hour),
        source: EventSource::Purchasing,
    })
}

pub fn adjustment(
    location_id: LocationId,
    item_id: ItemId,
    delta: Decimal,
    day: u32,
    hour: u32,
) -> StockEvent {
    StockEvent::Adjustment(Adjustment {
        location_id,
        item_id,
        quantity_delta: delta,
        uom: Uom::Ml,
        occurred_at: ts(day, hour),
        source: EventSource::Manual,
        session_id: None,
    })
}

/// Session source over a plain vector.
#[derive(Debug)]
pub struct StaticSessions {
    pub sessions: Vec<CountingSession>,
}

impl SessionSource for StaticSessions {
    fn closed_in_period(&self, location_id: LocationId, period: Period) -> Vec<CountingSession> {
        self.sessions
            .iter()
            .filter(|s| s.location_id() == location_id)
            .filter(|s| {
                s.closed_at()
                    .map_or(false, |closed| period.overlaps(s.opened_at(), closed))
            })
            .cloned()
            .collect()
    }

    fn recent_closed(&self, location_id: LocationId, limit: usize) -> Vec<CountingSession> {
        let mut closed: Vec<CountingSession> = self
            .sessions
            .iter()
            .filter(|s| s.location_id() == location_id && s.is_closed())
            .cloned()
            .collect();
        closed.sort_by_key(|s| s.closed_at());
        closed.reverse();
        closed.truncate(limit);
        closed
    }
}

/// Ledger source folding its event list for point-in-time levels.
#[derive(Debug)]
pub struct StaticLedger {
    pub events: Vec<StockEvent>,
}

impl LedgerSource for StaticLedger {
    fn events_in_period(&self, location_id: LocationId, period: Period) -> Vec<StockEvent> {
        self.events
            .iter()
            .filter(|e| e.location_id() == location_id && period.contains(e.occurred_at()))
            .cloned()
            .collect()
    }

    fn stock_levels(&self, location_id: LocationId, as_of: DateTime<Utc>) -> Vec<StockLevel> {
        let mut levels: HashMap<ItemId, Decimal> = HashMap::new();
        for event in &self.events {
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

/// Price source over real timelines.
#[derive(Debug)]
pub struct TimelinePrices {
    pub timelines: HashMap<ItemId, PriceTimeline>,
}

impl TimelinePrices {
    pub fn new() -> Self {
        Self {
            timelines: HashMap::new(),
        }
    }

    /// Flat per-unit cost effective well before any test period.
    pub fn set_flat(&mut self, item_id: ItemId, unit_cost: Decimal) {
        let mut timeline = PriceTimeline::new(item_id);
        timeline
            .append(PriceEntry {
                terms: PriceTerms::PerUnit { unit_cost },
                currency: Currency::Usd,
                effective_from: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            })
            .unwrap();
        self.timelines.insert(item_id, timeline);
    }

    pub fn insert(&mut self, timeline: PriceTimeline) {
        self.timelines.insert(timeline.item_id(), timeline);
    }
}

impl PriceSource for TimelinePrices {
    fn resolve_unit_cost(&self, item_id: ItemId, as_of: DateTime<Utc>) -> Option<ResolvedCost> {
        self.timelines.get(&item_id).and_then(|t| t.resolve(as_of))
    }
}

/// Catalog source over plain vectors.
#[derive(Debug)]
pub struct StaticCatalog {
    pub items: Vec<InventoryItem>,
    pub categories: Vec<Category>,
    pub templates: Vec<BottleTemplate>,
    pub keg_sizes: Vec<KegSize>,
}

impl StaticCatalog {
    pub fn with_items(items: Vec<InventoryItem>) -> Self {
        Self {
            items,
            categories: Vec::new(),
            templates: Vec::new(),
            keg_sizes: Vec::new(),
        }
    }
}

impl CatalogSource for StaticCatalog {
    fn item(&self, item_id: ItemId) -> Option<InventoryItem> {
        self.items.iter().find(|i| i.id == item_id).cloned()
    }

    fn items(&self, location_id: LocationId) -> Vec<InventoryItem> {
        self.items
            .iter()
            .filter(|i| i.location_id == location_id)
            .cloned()
            .collect()
    }

    fn category(&self, category_id: CategoryId) -> Option<Category> {
        self.categories.iter().find(|c| c.id == category_id).cloned()
    }

    fn bottle_template(&self, item_id: ItemId) -> Option<BottleTemplate> {
        self.templates.iter().find(|t| t.item_id == item_id).cloned()
    }

    fn keg_size(&self, name: &str) -> Option<KegSize> {
        self.keg_sizes.iter().find(|k| k.name == name).cloned()
    }
}
