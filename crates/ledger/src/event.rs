//! Append-only stock ledger facts.
//!
//! Every movement of stock is one of three immutable events. Quantities are
//! signed deltas in the item's base unit: receipts are positive, consumption
//! is negative, adjustments carry whichever sign reconciles the ledger to a
//! physical count.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{ItemId, LocationId, SessionId, Uom};

/// System that wrote a ledger event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Point-of-sale depletion feed.
    Pos,
    /// Purchasing/receiving workflow.
    Purchasing,
    /// Counting app session closure.
    CountApp,
    /// Manual correction by a manager.
    Manual,
}

/// Event: stock depleted by sales or recorded pours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    pub location_id: LocationId,
    pub item_id: ItemId,
    /// Negative for depletion; positive entries are corrections.
    pub quantity_delta: Decimal,
    pub uom: Uom,
    pub occurred_at: DateTime<Utc>,
    pub source: EventSource,
}

/// Event: stock received from a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub location_id: LocationId,
    pub item_id: ItemId,
    /// Positive quantity received, in the item's base unit.
    pub quantity_delta: Decimal,
    pub uom: Uom,
    pub occurred_at: DateTime<Utc>,
    pub source: EventSource,
}

/// Event: reconciliation delta emitted when a counting session closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub location_id: LocationId,
    pub item_id: ItemId,
    pub quantity_delta: Decimal,
    pub uom: Uom,
    pub occurred_at: DateTime<Utc>,
    pub source: EventSource,
    /// Session that produced this adjustment, when one did.
    pub session_id: Option<SessionId>,
}

/// Sum type over the three ledger fact kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StockEvent {
    Consumption(Consumption),
    Receipt(Receipt),
    Adjustment(Adjustment),
}

impl StockEvent {
    pub fn location_id(&self) -> LocationId {
        match self {
            StockEvent::Consumption(e) => e.location_id,
            StockEvent::Receipt(e) => e.location_id,
            StockEvent::Adjustment(e) => e.location_id,
        }
    }

    pub fn item_id(&self) -> ItemId {
        match self {
            StockEvent::Consumption(e) => e.item_id,
            StockEvent::Receipt(e) => e.item_id,
            StockEvent::Adjustment(e) => e.item_id,
        }
    }

    pub fn quantity_delta(&self) -> Decimal {
        match self {
            StockEvent::Consumption(e) => e.quantity_delta,
            StockEvent::Receipt(e) => e.quantity_delta,
            StockEvent::Adjustment(e) => e.quantity_delta,
        }
    }

    pub fn uom(&self) -> Uom {
        match self {
            StockEvent::Consumption(e) => e.uom,
            StockEvent::Receipt(e) => e.uom,
            StockEvent::Adjustment(e) => e.uom,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockEvent::Consumption(e) => e.occurred_at,
            StockEvent::Receipt(e) => e.occurred_at,
            StockEvent::Adjustment(e) => e.occurred_at,
        }
    }

    pub fn source(&self) -> EventSource {
        match self {
            StockEvent::Consumption(e) => e.source,
            StockEvent::Receipt(e) => e.source,
            StockEvent::Adjustment(e) => e.source,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            StockEvent::Consumption(_) => "ledger.consumption",
            StockEvent::Receipt(_) => "ledger.receipt",
            StockEvent::Adjustment(_) => "ledger.adjustment",
        }
    }
}
