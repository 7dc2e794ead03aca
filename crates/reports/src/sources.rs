//! Read seams the report engine consumes.
//!
//! The surrounding application owns persistence; the engine sees it only
//! through these traits. Every method returns owned data so implementations
//! are free to page, cache, or recompute. All four traits get a blanket
//! `Arc` impl so stores can be shared across the engine and other readers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_catalog::{BottleTemplate, Category, InventoryItem, KegSize};
use barstock_core::{CategoryId, ItemId, LocationId, Period};
use barstock_ledger::{CountingSession, StockEvent};
use barstock_pricing::ResolvedCost;

/// On-hand quantity of one item at a point in time, in its base unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub item_id: ItemId,
    pub quantity: Decimal,
}

/// Ledger read API: period-bounded events and point-in-time stock levels.
pub trait LedgerSource: Send + Sync {
    /// Events with `occurred_at` inside the period, for one location.
    fn events_in_period(&self, location_id: LocationId, period: Period) -> Vec<StockEvent>;

    /// On-hand quantity per item at `as_of`. The persistence layer owns the
    /// full event history, so point-in-time levels come from it rather than
    /// from a bounded period query.
    fn stock_levels(&self, location_id: LocationId, as_of: DateTime<Utc>) -> Vec<StockLevel>;
}

impl<L> LedgerSource for Arc<L>
where
    L: LedgerSource + ?Sized,
{
    fn events_in_period(&self, location_id: LocationId, period: Period) -> Vec<StockEvent> {
        (**self).events_in_period(location_id, period)
    }

    fn stock_levels(&self, location_id: LocationId, as_of: DateTime<Utc>) -> Vec<StockLevel> {
        (**self).stock_levels(location_id, as_of)
    }
}

/// Counting session read API.
pub trait SessionSource: Send + Sync {
    /// Closed sessions whose open/close span overlaps the period.
    fn closed_in_period(&self, location_id: LocationId, period: Period) -> Vec<CountingSession>;

    /// The most recently closed sessions, newest first.
    fn recent_closed(&self, location_id: LocationId, limit: usize) -> Vec<CountingSession>;
}

impl<S> SessionSource for Arc<S>
where
    S: SessionSource + ?Sized,
{
    fn closed_in_period(&self, location_id: LocationId, period: Period) -> Vec<CountingSession> {
        (**self).closed_in_period(location_id, period)
    }

    fn recent_closed(&self, location_id: LocationId, limit: usize) -> Vec<CountingSession> {
        (**self).recent_closed(location_id, limit)
    }
}

/// Price history read API.
pub trait PriceSource: Send + Sync {
    /// Unit cost applicable at `as_of`; `None` when no record covers it.
    fn resolve_unit_cost(&self, item_id: ItemId, as_of: DateTime<Utc>) -> Option<ResolvedCost>;
}

impl<P> PriceSource for Arc<P>
where
    P: PriceSource + ?Sized,
{
    fn resolve_unit_cost(&self, item_id: ItemId, as_of: DateTime<Utc>) -> Option<ResolvedCost> {
        (**self).resolve_unit_cost(item_id, as_of)
    }
}

/// Item and category metadata read API.
pub trait CatalogSource: Send + Sync {
    fn item(&self, item_id: ItemId) -> Option<InventoryItem>;
    fn items(&self, location_id: LocationId) -> Vec<InventoryItem>;
    fn category(&self, category_id: CategoryId) -> Option<Category>;
    fn bottle_template(&self, item_id: ItemId) -> Option<BottleTemplate>;
    fn keg_size(&self, name: &str) -> Option<KegSize>;
}

impl<C> CatalogSource for Arc<C>
where
    C: CatalogSource + ?Sized,
{
    fn item(&self, item_id: ItemId) -> Option<InventoryItem> {
        (**self).item(item_id)
    }

    fn items(&self, location_id: LocationId) -> Vec<InventoryItem> {
        (**self).items(location_id)
    }

    fn category(&self, category_id: CategoryId) -> Option<Category> {
        (**self).category(category_id)
    }

    fn bottle_template(&self, item_id: ItemId) -> Option<BottleTemplate> {
        (**self).bottle_template(item_id)
    }

    fn keg_size(&self, name: &str) -> Option<KegSize> {
        (**self).keg_size(name)
    }
}
