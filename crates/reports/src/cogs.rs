//! Period cost of goods sold.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{ItemId, LocationId, Period, Uom};
use barstock_ledger::StockEvent;

use crate::sources::{CatalogSource, LedgerSource, PriceSource};

/// One receipt line inside a COGS report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: Decimal,
    pub uom: Uom,
    pub received_at: DateTime<Utc>,
    /// Cost at the receipt's own timestamp; `None` when unresolvable.
    pub unit_cost: Option<Decimal>,
    pub line_total: Option<Decimal>,
}

/// Periodic-inventory COGS summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CogsReport {
    pub opening_value: Decimal,
    pub purchases_value: Decimal,
    pub closing_value: Decimal,
    /// `opening + purchases - closing`. A derived report figure; the engine
    /// does not cross-check it against usage totals.
    pub cogs: Decimal,
    pub purchases: Vec<PurchaseLine>,
}

/// COGS for one location over a period.
///
/// Opening and closing stock are valued at the period boundaries; each
/// purchase is valued at its own receipt timestamp, since receipts at
/// different times may carry different costs. Items with no resolvable
/// cost contribute nothing to the totals.
pub fn cogs_report<L, P, C>(
    ledger: &L,
    prices: &P,
    catalog: &C,
    location_id: LocationId,
    period: Period,
) -> CogsReport
where
    L: LedgerSource,
    P: PriceSource,
    C: CatalogSource,
{
    let opening_value = stock_value(ledger, prices, location_id, period.start());
    let closing_value = stock_value(ledger, prices, location_id, period.end());

    let mut purchases: Vec<PurchaseLine> = Vec::new();
    let mut purchases_value = Decimal::ZERO;
    for event in ledger.events_in_period(location_id, period) {
        if let StockEvent::Receipt(receipt) = event {
            let unit_cost = prices
                .resolve_unit_cost(receipt.item_id, receipt.occurred_at)
                .map(|c| c.unit_cost);
            let line_total = unit_cost.map(|cost| receipt.quantity_delta * cost);
            if let Some(total) = line_total {
                purchases_value += total;
            }
            let item_name = catalog
                .item(receipt.item_id)
                .map(|i| i.name)
                .unwrap_or_default();
            purchases.push(PurchaseLine {
                item_id: receipt.item_id,
                item_name,
                quantity: receipt.quantity_delta,
                uom: receipt.uom,
                received_at: receipt.occurred_at,
                unit_cost,
                line_total,
            });
        }
    }
    purchases.sort_by(|a, b| {
        a.received_at
            .cmp(&b.received_at)
            .then_with(|| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()))
    });

    CogsReport {
        opening_value,
        purchases_value,
        closing_value,
        cogs: opening_value + purchases_value - closing_value,
        purchases,
    }
}

/// Value of on-hand stock at a point in time.
fn stock_value<L, P>(
    ledger: &L,
    prices: &P,
    location_id: LocationId,
    as_of: DateTime<Utc>,
) -> Decimal
where
    L: LedgerSource,
    P: PriceSource,
{
    ledger
        .stock_levels(location_id, as_of)
        .into_iter()
        .filter_map(|level| {
            prices
                .resolve_unit_cost(level.item_id, as_of)
                .map(|cost| level.quantity * cost.unit_cost)
        })
        .sum()
}
