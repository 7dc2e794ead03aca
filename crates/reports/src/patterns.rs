//! Multi-session variance patterns: trend classification and chronic
//! shrinkage detection.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult, ItemId, LocationId};

use crate::config::AnalysisConfig;
use crate::sources::{CatalogSource, SessionSource};

/// Bounds on how many recent sessions a pattern query may examine.
pub const MIN_SESSION_COUNT: usize = 3;
pub const MAX_SESSION_COUNT: usize = 50;

/// Direction of an item's variance magnitude across the examined window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceTrend {
    Worsening,
    Stable,
    Improving,
}

impl VarianceTrend {
    /// Display rank: worsening sorts before stable, stable before improving.
    pub fn rank(&self) -> u8 {
        match self {
            VarianceTrend::Worsening => 0,
            VarianceTrend::Stable => 1,
            VarianceTrend::Improving => 2,
        }
    }
}

/// Sort key for pattern rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternSortKey {
    Name,
    Sessions,
    AvgVariance,
    Trend,
    Loss,
}

/// Per-item variance pattern over the examined window. Derived on every
/// query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariancePatternRow {
    pub item_id: ItemId,
    pub item_name: String,
    /// Sessions in the window that counted this item.
    pub sessions_appeared: usize,
    /// Of those, sessions whose variance was non-zero.
    pub sessions_with_variance: usize,
    /// Mean per-session variance over the appearances.
    pub avg_variance: Decimal,
    pub trend: VarianceTrend,
    /// Signed sum of per-session variances; negative is net shrinkage.
    pub total_estimated_loss: Decimal,
    pub is_shrinkage_suspect: bool,
}

/// Analyze the last `session_count` closed sessions, one row per item that
/// was counted at least once. Rows come back sorted by name; use
/// [`sort_rows`] to re-order for other display keys.
pub fn pattern_report<S, C>(
    sessions: &S,
    catalog: &C,
    config: &AnalysisConfig,
    location_id: LocationId,
    session_count: usize,
) -> DomainResult<Vec<VariancePatternRow>>
where
    S: SessionSource,
    C: CatalogSource,
{
    if !(MIN_SESSION_COUNT..=MAX_SESSION_COUNT).contains(&session_count) {
        return Err(DomainError::validation(format!(
            "session count must lie in [{MIN_SESSION_COUNT}, {MAX_SESSION_COUNT}], got {session_count}"
        )));
    }

    // Oldest to newest, so each item's series lines up with elapsed time.
    let mut window = sessions.recent_closed(location_id, session_count);
    window.reverse();

    let mut series: HashMap<ItemId, Vec<Decimal>> = HashMap::new();
    for session in &window {
        for line in session.lines() {
            series.entry(line.item_id).or_default().push(line.variance());
        }
    }

    let mut rows: Vec<VariancePatternRow> = series
        .into_iter()
        .map(|(item_id, variances)| {
            let sessions_appeared = variances.len();
            let sessions_with_variance = variances.iter().filter(|v| !v.is_zero()).count();
            let total_estimated_loss: Decimal = variances.iter().copied().sum();
            // At least one appearance by construction.
            let avg_variance = total_estimated_loss / Decimal::from(sessions_appeared as u64);
            let trend = classify_trend(&variances, config.trend_margin);
            let is_shrinkage_suspect = shrinkage_suspect(
                config,
                sessions_appeared,
                sessions_with_variance,
                avg_variance,
                total_estimated_loss,
            );
            let item_name = catalog.item(item_id).map(|i| i.name).unwrap_or_default();
            VariancePatternRow {
                item_id,
                item_name,
                sessions_appeared,
                sessions_with_variance,
                avg_variance,
                trend,
                total_estimated_loss,
                is_shrinkage_suspect,
            }
        })
        .collect();

    sort_rows(&mut rows, PatternSortKey::Name);
    Ok(rows)
}

/// Order rows for display. Worst-first directions: most negative average
/// and loss first, worsening trend first, most appearances first. Every
/// key breaks ties by case-insensitive item name, so repeated queries
/// render identically.
pub fn sort_rows(rows: &mut [VariancePatternRow], key: PatternSortKey) {
    rows.sort_by(|a, b| {
        let primary = match key {
            PatternSortKey::Name => std::cmp::Ordering::Equal,
            PatternSortKey::Sessions => b.sessions_appeared.cmp(&a.sessions_appeared),
            PatternSortKey::AvgVariance => a.avg_variance.cmp(&b.avg_variance),
            PatternSortKey::Trend => a.trend.rank().cmp(&b.trend.rank()),
            PatternSortKey::Loss => a.total_estimated_loss.cmp(&b.total_estimated_loss),
        };
        primary.then_with(|| a.item_name.to_lowercase().cmp(&b.item_name.to_lowercase()))
    });
}

/// Compare the newer half's mean variance magnitude to the older half's,
/// with a relative margin. Fewer than four observations cannot establish
/// a direction.
fn classify_trend(variances: &[Decimal], margin: Decimal) -> VarianceTrend {
    if variances.len() < 4 {
        return VarianceTrend::Stable;
    }
    let mid = variances.len() / 2;
    let older = mean_magnitude(&variances[..mid]);
    let newer = mean_magnitude(&variances[mid..]);
    if newer > older * (Decimal::ONE + margin) {
        VarianceTrend::Worsening
    } else if newer < older * (Decimal::ONE - margin) {
        VarianceTrend::Improving
    } else {
        VarianceTrend::Stable
    }
}

fn mean_magnitude(variances: &[Decimal]) -> Decimal {
    // Callers pass at least two observations per half.
    let sum: Decimal = variances.iter().map(|v| v.abs()).sum();
    sum / Decimal::from(variances.len() as u64)
}

/// Every enabled rule threshold must hold, on top of the base conditions:
/// negative average variance and at least two appearances, so a single bad
/// session never raises the flag. With both rules disabled the detector is
/// off entirely.
fn shrinkage_suspect(
    config: &AnalysisConfig,
    sessions_appeared: usize,
    sessions_with_variance: usize,
    avg_variance: Decimal,
    total_estimated_loss: Decimal,
) -> bool {
    if sessions_appeared < 2 || avg_variance >= Decimal::ZERO {
        return false;
    }
    let recurrence = config.shrinkage_recurrence;
    let loss = config.shrinkage_loss;
    if !recurrence.enabled && !loss.enabled {
        return false;
    }
    if recurrence.enabled {
        // Recurrence fraction versus threshold, compared without dividing.
        let appeared = Decimal::from(sessions_appeared as u64);
        let with_variance = Decimal::from(sessions_with_variance as u64);
        if with_variance < recurrence.threshold * appeared {
            return false;
        }
    }
    if loss.enabled && total_estimated_loss.abs() < loss.threshold {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        StaticCatalog, StaticSessions, closed_session, test_item, test_location,
    };
    use barstock_catalog::InventoryItem;
    use barstock_ledger::CountingSession;
    use rust_decimal_macros::dec;

    /// One closed session per variance value, oldest first, with the
    /// theoretical count fixed at 10.
    fn sessions_with_variances(
        location: barstock_core::LocationId,
        item: &InventoryItem,
        variances: &[Decimal],
    ) -> Vec<CountingSession> {
        variances
            .iter()
            .enumerate()
            .map(|(i, v)| {
                closed_session(location, 1 + i as u32, &[(item.id, dec!(10), dec!(10) + *v)])
            })
            .collect()
    }

    #[test]
    fn session_count_outside_bounds_is_rejected() {
        let location = test_location();
        let catalog = StaticCatalog::with_items(vec![]);
        let sessions = StaticSessions { sessions: vec![] };
        let config = AnalysisConfig::default();

        for bad in [0, 2, 51] {
            let err =
                pattern_report(&sessions, &catalog, &config, location, bad).unwrap_err();
            match err {
                DomainError::Validation(msg) => assert!(msg.contains("session count")),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
        assert!(pattern_report(&sessions, &catalog, &config, location, 3).is_ok());
        assert!(pattern_report(&sessions, &catalog, &config, location, 50).is_ok());
    }

    #[test]
    fn chronic_shrinkage_is_flagged() {
        let location = test_location();
        let gin = test_item(location, "Gin");
        let catalog = StaticCatalog::with_items(vec![gin.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &gin,
                &[dec!(-5), dec!(-4), dec!(-6), dec!(-5)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.sessions_appeared, 4);
        assert_eq!(row.sessions_with_variance, 4);
        assert_eq!(row.avg_variance, dec!(-5));
        assert_eq!(row.total_estimated_loss, dec!(-20));
        // Newer-half magnitude 5.5 exceeds older-half 4.5 by more than 15%.
        assert_eq!(row.trend, VarianceTrend::Worsening);
        assert!(row.is_shrinkage_suspect);

        let again = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert_eq!(rows, again);
    }

    #[test]
    fn alternating_variance_is_not_flagged() {
        let location = test_location();
        let rum = test_item(location, "Rum");
        let catalog = StaticCatalog::with_items(vec![rum.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &rum,
                &[dec!(-5), dec!(5), dec!(-3), dec!(4)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        let row = &rows[0];
        assert_eq!(row.avg_variance, dec!(0.25));
        assert!(!row.is_shrinkage_suspect);
    }

    #[test]
    fn single_bad_session_never_triggers_the_flag() {
        let location = test_location();
        let whiskey = test_item(location, "Whiskey");
        let catalog = StaticCatalog::with_items(vec![whiskey.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(location, &whiskey, &[dec!(-50)]),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        let row = &rows[0];
        assert_eq!(row.sessions_appeared, 1);
        assert_eq!(row.total_estimated_loss, dec!(-50));
        assert!(!row.is_shrinkage_suspect);
    }

    #[test]
    fn low_recurrence_is_not_flagged() {
        let location = test_location();
        let port = test_item(location, "Port");
        let catalog = StaticCatalog::with_items(vec![port.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &port,
                &[dec!(-10), dec!(0), dec!(0), dec!(0)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        let row = &rows[0];
        assert_eq!(row.sessions_with_variance, 1);
        assert!(row.avg_variance < Decimal::ZERO);
        assert!(!row.is_shrinkage_suspect);
    }

    #[test]
    fn small_losses_stay_below_the_loss_threshold() {
        let location = test_location();
        let sherry = test_item(location, "Sherry");
        let catalog = StaticCatalog::with_items(vec![sherry.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &sherry,
                &[dec!(-1), dec!(-2), dec!(-1), dec!(-1)],
            ),
        };

        let config = AnalysisConfig::default();
        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert!(!rows[0].is_shrinkage_suspect);

        // Disabling the loss rule waives its threshold.
        let mut relaxed = AnalysisConfig::default();
        relaxed.shrinkage_loss.enabled = false;
        let rows = pattern_report(&sessions, &catalog, &relaxed, location, 10).unwrap();
        assert!(rows[0].is_shrinkage_suspect);
    }

    #[test]
    fn disabling_both_rules_turns_the_detector_off() {
        let location = test_location();
        let gin = test_item(location, "Gin");
        let catalog = StaticCatalog::with_items(vec![gin.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &gin,
                &[dec!(-5), dec!(-4), dec!(-6), dec!(-5)],
            ),
        };

        let mut config = AnalysisConfig::default();
        config.shrinkage_recurrence.enabled = false;
        config.shrinkage_loss.enabled = false;

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert!(!rows[0].is_shrinkage_suspect);
    }

    #[test]
    fn short_series_reads_as_stable() {
        let location = test_location();
        let mezcal = test_item(location, "Mezcal");
        let catalog = StaticCatalog::with_items(vec![mezcal.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &mezcal,
                &[dec!(-5), dec!(-6), dec!(-7)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert_eq!(rows[0].trend, VarianceTrend::Stable);
    }

    #[test]
    fn shrinking_magnitudes_read_as_improving() {
        let location = test_location();
        let tequila = test_item(location, "Tequila");
        let catalog = StaticCatalog::with_items(vec![tequila.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &tequila,
                &[dec!(-10), dec!(-9), dec!(-2), dec!(-1)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert_eq!(rows[0].trend, VarianceTrend::Improving);
    }

    #[test]
    fn flat_magnitudes_within_margin_read_as_stable() {
        let location = test_location();
        let campari = test_item(location, "Campari");
        let catalog = StaticCatalog::with_items(vec![campari.clone()]);
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &campari,
                &[dec!(-5), dec!(-5), dec!(-5), dec!(-5)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 10).unwrap();
        assert_eq!(rows[0].trend, VarianceTrend::Stable);
    }

    #[test]
    fn window_truncates_to_the_most_recent_sessions() {
        let location = test_location();
        let beer = test_item(location, "Beer");
        let catalog = StaticCatalog::with_items(vec![beer.clone()]);
        // Five sessions of -1 each; only the last three are examined.
        let sessions = StaticSessions {
            sessions: sessions_with_variances(
                location,
                &beer,
                &[dec!(-1), dec!(-1), dec!(-1), dec!(-1), dec!(-1)],
            ),
        };
        let config = AnalysisConfig::default();

        let rows = pattern_report(&sessions, &catalog, &config, location, 3).unwrap();
        assert_eq!(rows[0].sessions_appeared, 3);
        assert_eq!(rows[0].total_estimated_loss, dec!(-3));
    }

    #[test]
    fn sort_keys_order_worst_first_with_name_tie_break() {
        fn row(
            name: &str,
            sessions: usize,
            avg: Decimal,
            trend: VarianceTrend,
            loss: Decimal,
        ) -> VariancePatternRow {
            VariancePatternRow {
                item_id: ItemId::new(),
                item_name: name.into(),
                sessions_appeared: sessions,
                sessions_with_variance: sessions,
                avg_variance: avg,
                trend,
                total_estimated_loss: loss,
                is_shrinkage_suspect: false,
            }
        }

        let beta = row("beta", 4, dec!(-5), VarianceTrend::Worsening, dec!(-20));
        let alpha = row("Alpha", 2, dec!(-5), VarianceTrend::Stable, dec!(-10));
        let gamma = row("gamma", 4, dec!(-0.5), VarianceTrend::Improving, dec!(-2));

        let names = |rows: &[VariancePatternRow]| -> Vec<String> {
            rows.iter().map(|r| r.item_name.clone()).collect()
        };

        let mut rows = vec![beta.clone(), alpha.clone(), gamma.clone()];
        sort_rows(&mut rows, PatternSortKey::Name);
        assert_eq!(names(&rows), vec!["Alpha", "beta", "gamma"]);

        sort_rows(&mut rows, PatternSortKey::Loss);
        assert_eq!(names(&rows), vec!["beta", "Alpha", "gamma"]);

        sort_rows(&mut rows, PatternSortKey::Trend);
        assert_eq!(names(&rows), vec!["beta", "Alpha", "gamma"]);

        sort_rows(&mut rows, PatternSortKey::Sessions);
        assert_eq!(names(&rows), vec!["beta", "gamma", "Alpha"]);

        sort_rows(&mut rows, PatternSortKey::AvgVariance);
        assert_eq!(names(&rows), vec!["Alpha", "beta", "gamma"]);
    }
}
