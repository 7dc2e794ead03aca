//! Theoretical vs. actual variance over a period.

use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use barstock_core::{ItemId, LocationId, Period};

use crate::sources::{CatalogSource, PriceSource, SessionSource};

/// Variance of one item over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVariance {
    pub item_id: ItemId,
    pub item_name: String,
    /// What the ledger expected, summed over the period's sessions.
    pub theoretical: Decimal,
    /// What physical counts found.
    pub actual: Decimal,
    /// `actual - theoretical`; negative is shrinkage, positive is overage.
    pub variance: Decimal,
    /// Variance as a percent of theoretical; exactly zero when theoretical
    /// is zero.
    pub variance_pct: Decimal,
    /// `variance x unit cost` at period end; `None` when no cost resolves.
    pub value_impact: Option<Decimal>,
}

/// Variance for a single item, or `None` when no closed session in the
/// period counted it. Absence of data is not a zero.
pub fn item_variance<S, P, C>(
    sessions: &S,
    prices: &P,
    catalog: &C,
    item_id: ItemId,
    period: Period,
) -> Option<ItemVariance>
where
    S: SessionSource,
    P: PriceSource,
    C: CatalogSource,
{
    let item = catalog.item(item_id)?;
    let mut theoretical = Decimal::ZERO;
    let mut actual = Decimal::ZERO;
    let mut counted = false;
    for session in sessions.closed_in_period(item.location_id, period) {
        if let Some(line) = session.line_for(item_id) {
            theoretical += line.theoretical_qty;
            actual += line.actual_qty;
            counted = true;
        }
    }
    if !counted {
        return None;
    }
    Some(build_row(
        prices,
        item_id,
        item.name,
        theoretical,
        actual,
        period,
    ))
}

/// Variance for every item counted in the period, ranked worst first
/// (most negative variance first), ties broken by case-insensitive name.
pub fn variance_report<S, P, C>(
    sessions: &S,
    prices: &P,
    catalog: &C,
    location_id: LocationId,
    period: Period,
) -> Vec<ItemVariance>
where
    S: SessionSource,
    P: PriceSource,
    C: CatalogSource,
{
    let mut totals: HashMap<ItemId, (Decimal, Decimal)> = HashMap::new();
    for session in sessions.closed_in_period(location_id, period) {
        for line in session.lines() {
            let entry = totals
                .entry(line.item_id)
                .or_insert((Decimal::ZERO, Decimal::ZERO));
            entry.0 += line.theoretical_qty;
            entry.1 += line.actual_qty;
        }
    }

    let mut rows: Vec<ItemVariance> = totals
        .into_iter()
        .map(|(item_id, (theoretical, actual))| {
            let name = catalog
                .item(item_id)
                .map(|i| i.name)
                .unwrap_or_default();
            build_row(prices, item_id, name, theoretical, actual, period)
        })
        .collect();

    rows.sort_by(|a, b| {
        a.variance
            .cmp(&b.variance)
            .then_with(|| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()))
    });
    rows
}

fn build_row<P: PriceSource>(
    prices: &P,
    item_id: ItemId,
    item_name: String,
    theoretical: Decimal,
    actual: Decimal,
    period: Period,
) -> ItemVariance {
    let variance = actual - theoretical;
    let variance_pct = if theoretical.is_zero() {
        Decimal::ZERO
    } else {
        variance / theoretical * dec!(100)
    };
    let value_impact = prices
        .resolve_unit_cost(item_id, period.end())
        .map(|cost| variance * cost.unit_cost);
    ItemVariance {
        item_id,
        item_name,
        theoretical,
        actual,
        variance,
        variance_pct,
        value_impact,
    }
}
