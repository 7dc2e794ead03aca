//! Item and category metadata read by the engine.
//!
//! These rows are owned by the surrounding application; the engine only
//! reads them. Identity fields are immutable once written.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{CategoryId, Density, ItemId, LocationId, Uom};

/// How a category's items are counted during a session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMethod {
    /// Open bottles weighed on a scale; on-hand volume derived via density.
    Weighable,
    /// Whole sealed units counted by hand.
    UnitCount,
    /// Kegs tracked by tapped fraction of a named keg size.
    Keg,
}

/// Item category: carries the counting method and a density default
/// inherited by items without a template override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub location_id: LocationId,
    pub name: String,
    pub count_method: CountMethod,
    pub default_density: Option<Density>,
}

/// A tracked inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ItemId,
    pub location_id: LocationId,
    pub name: String,
    pub category_id: CategoryId,
    /// Unit all ledger quantities for this item are recorded in.
    pub base_uom: Uom,
    /// Size of one container, in `container_uom`.
    pub container_size: Option<Decimal>,
    pub container_uom: Option<Uom>,
    /// Containers per purchasing case.
    pub pack_size: Option<u32>,
}
