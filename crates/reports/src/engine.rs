//! Report engine facade.

use tracing::debug;

use barstock_core::{DomainResult, ItemId, LocationId, Period};

use crate::cogs::{self, CogsReport};
use crate::config::AnalysisConfig;
use crate::patterns::{self, VariancePatternRow};
use crate::sources::{CatalogSource, LedgerSource, PriceSource, SessionSource};
use crate::usage::{self, UsageReport};
use crate::variance::{self, ItemVariance};

/// The report queries behind one handle.
///
/// Bundles the four read seams plus the analysis configuration. The engine
/// is stateless: every call reads fresh collaborator data, so one engine
/// serves concurrent report requests.
#[derive(Debug, Clone)]
pub struct ReportEngine<L, S, P, C> {
    ledger: L,
    sessions: S,
    prices: P,
    catalog: C,
    config: AnalysisConfig,
}

impl<L, S, P, C> ReportEngine<L, S, P, C>
where
    L: LedgerSource,
    S: SessionSource,
    P: PriceSource,
    C: CatalogSource,
{
    /// Build an engine, rejecting an out-of-range configuration up front.
    pub fn new(
        ledger: L,
        sessions: S,
        prices: P,
        catalog: C,
        config: AnalysisConfig,
    ) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger,
            sessions,
            prices,
            catalog,
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Variance for one item, `None` when the period holds no session data
    /// for it.
    pub fn item_variance(&self, item_id: ItemId, period: Period) -> Option<ItemVariance> {
        variance::item_variance(&self.sessions, &self.prices, &self.catalog, item_id, period)
    }

    /// Variance for every item counted in the period, worst first.
    pub fn variance_report(&self, location_id: LocationId, period: Period) -> Vec<ItemVariance> {
        debug!(%location_id, start = %period.start(), end = %period.end(), "variance report");
        variance::variance_report(&self.sessions, &self.prices, &self.catalog, location_id, period)
    }

    /// Opening, purchases, closing, and the derived COGS figure.
    pub fn cogs_report(&self, location_id: LocationId, period: Period) -> CogsReport {
        debug!(%location_id, start = %period.start(), end = %period.end(), "cogs report");
        cogs::cogs_report(&self.ledger, &self.prices, &self.catalog, location_id, period)
    }

    /// Consumption quantity and cost per item.
    pub fn usage_report(&self, location_id: LocationId, period: Period) -> UsageReport {
        debug!(%location_id, start = %period.start(), end = %period.end(), "usage report");
        usage::usage_report(
            &self.ledger,
            &self.sessions,
            &self.prices,
            &self.catalog,
            location_id,
            period,
        )
    }

    /// Pattern rows over the last `session_count` closed sessions.
    pub fn pattern_report(
        &self,
        location_id: LocationId,
        session_count: usize,
    ) -> DomainResult<Vec<VariancePatternRow>> {
        debug!(%location_id, session_count, "pattern report");
        patterns::pattern_report(
            &self.sessions,
            &self.catalog,
            &self.config,
            location_id,
            session_count,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        StaticCatalog, StaticLedger, StaticSessions, TimelinePrices, closed_session, consumption,
        period, receipt, test_item, test_location,
    };
    use barstock_core::DomainError;
    use rust_decimal_macros::dec;

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = AnalysisConfig::default();
        config.trend_margin = dec!(1);

        let err = ReportEngine::new(
            StaticLedger { events: vec![] },
            StaticSessions { sessions: vec![] },
            TimelinePrices::new(),
            StaticCatalog::with_items(vec![]),
            config,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("trend margin")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn one_engine_serves_all_four_reports() {
        let location = test_location();
        let gin = test_item(location, "Gin");

        let ledger = StaticLedger {
            events: vec![
                receipt(location, gin.id, dec!(1000), 1, 8),
                consumption(location, gin.id, dec!(-120), 12, 21),
                receipt(location, gin.id, dec!(700), 14, 9),
            ],
        };
        let sessions = StaticSessions {
            sessions: vec![
                closed_session(location, 13, &[(gin.id, dec!(900), dec!(880))]),
                closed_session(location, 16, &[(gin.id, dec!(1560), dec!(1545))]),
            ],
        };
        let mut prices = TimelinePrices::new();
        prices.set_flat(gin.id, dec!(0.04));
        let catalog = StaticCatalog::with_items(vec![gin.clone()]);

        let engine =
            ReportEngine::new(ledger, sessions, prices, catalog, AnalysisConfig::default())
                .unwrap();

        let window = period(10, 20);
        let variance = engine.variance_report(location, window);
        assert_eq!(variance.len(), 1);
        assert_eq!(variance[0].variance, dec!(-35));
        assert_eq!(
            engine.item_variance(gin.id, window).unwrap().variance,
            dec!(-35)
        );

        let cogs = engine.cogs_report(location, window);
        assert_eq!(
            cogs.cogs,
            cogs.opening_value + cogs.purchases_value - cogs.closing_value
        );
        assert_eq!(cogs.purchases.len(), 1);

        let usage = engine.usage_report(location, window);
        assert_eq!(usage.total_items, 1);
        assert_eq!(usage.items[0].quantity_used, dec!(120));
        assert_eq!(usage.total_sessions, 2);

        let patterns = engine.pattern_report(location, 10).unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].sessions_appeared, 2);
    }
}
