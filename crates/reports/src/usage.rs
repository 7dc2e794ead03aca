//! Consumption quantity and cost per item over a period.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{ItemId, LocationId, Period, Uom};
use barstock_ledger::StockEvent;

use crate::sources::{CatalogSource, LedgerSource, PriceSource, SessionSource};

/// Usage of one item over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLine {
    pub item_id: ItemId,
    pub item_name: String,
    /// Magnitude of the period's negative consumption deltas, in the
    /// item's base unit.
    pub quantity_used: Decimal,
    pub uom: Uom,
    /// Cost at period end; `None` when unresolvable.
    pub unit_cost: Option<Decimal>,
    pub total_cost: Option<Decimal>,
}

/// Usage summary for one location over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    pub total_items: usize,
    /// Sum of the resolvable line costs only. Unpriced items stay listed
    /// but contribute nothing here.
    pub total_usage_cost: Decimal,
    /// Closed sessions overlapping the period, the denominator for
    /// usage-per-session reporting.
    pub total_sessions: usize,
    pub items: Vec<UsageLine>,
}

/// Usage per item, costliest lines first, unpriced lines last, ties broken
/// by case-insensitive name. Positive consumption deltas are corrections
/// and do not count as usage.
pub fn usage_report<L, S, P, C>(
    ledger: &L,
    sessions: &S,
    prices: &P,
    catalog: &C,
    location_id: LocationId,
    period: Period,
) -> UsageReport
where
    L: LedgerSource,
    S: SessionSource,
    P: PriceSource,
    C: CatalogSource,
{
    let mut used: HashMap<ItemId, (Decimal, Uom)> = HashMap::new();
    for event in ledger.events_in_period(location_id, period) {
        if let StockEvent::Consumption(consumption) = event {
            if consumption.quantity_delta < Decimal::ZERO {
                let entry = used
                    .entry(consumption.item_id)
                    .or_insert((Decimal::ZERO, consumption.uom));
                entry.0 += -consumption.quantity_delta;
            }
        }
    }

    let mut items: Vec<UsageLine> = used
        .into_iter()
        .map(|(item_id, (quantity_used, uom))| {
            let unit_cost = prices
                .resolve_unit_cost(item_id, period.end())
                .map(|c| c.unit_cost);
            let item_name = catalog.item(item_id).map(|i| i.name).unwrap_or_default();
            UsageLine {
                item_id,
                item_name,
                quantity_used,
                uom,
                unit_cost,
                total_cost: unit_cost.map(|cost| quantity_used * cost),
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.total_cost
            .cmp(&a.total_cost)
            .then_with(|| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()))
    });

    let total_usage_cost = items.iter().filter_map(|line| line.total_cost).sum();
    UsageReport {
        total_items: items.len(),
        total_usage_cost,
        total_sessions: sessions.closed_in_period(location_id, period).len(),
        items,
    }
}
