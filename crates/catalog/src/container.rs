//! Keg sizes, bottle templates, and the weighable-item math.
//!
//! Weighable items are counted by putting the open bottle on a scale; the
//! template's tare weight and an effective density turn grams into
//! millilitres. Kegs are costed per container, so a keg size's capacity is
//! the divisor when deriving a per-unit cost from a per-container price.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use barstock_core::uom::{ml_to_g, oz_to_ml};
use barstock_core::{Density, DomainError, DomainResult, ItemId};

/// A named reference keg volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KegSize {
    pub name: String,
    pub capacity_oz: Decimal,
}

impl KegSize {
    pub fn new(name: impl Into<String>, capacity_oz: Decimal) -> DomainResult<Self> {
        if capacity_oz <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "keg capacity must be positive, got {capacity_oz} oz"
            )));
        }
        Ok(Self {
            name: name.into(),
            capacity_oz,
        })
    }

    /// US half barrel, 15.5 gal.
    pub fn half_barrel() -> Self {
        Self {
            name: "Half Barrel".into(),
            capacity_oz: dec!(1984),
        }
    }

    /// US quarter barrel, 7.75 gal.
    pub fn quarter_barrel() -> Self {
        Self {
            name: "Quarter Barrel".into(),
            capacity_oz: dec!(992),
        }
    }

    /// Sixth barrel, 5.16 gal.
    pub fn sixth_barrel() -> Self {
        Self {
            name: "Sixth Barrel".into(),
            capacity_oz: dec!(661),
        }
    }

    /// European 50 litre keg.
    pub fn fifty_litre() -> Self {
        Self {
            name: "50 Litre".into(),
            capacity_oz: dec!(1690),
        }
    }

    /// Capacity in millilitres, for items whose base unit is mL.
    pub fn capacity_ml(&self) -> Decimal {
        oz_to_ml(self.capacity_oz)
    }
}

/// Where an effective density came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensitySource {
    /// The item's bottle template carries an override.
    Template,
    /// Inherited from the item's category default.
    Category,
    /// Neither was set; the 0.95 g/mL system default applies.
    System,
}

/// A resolved density together with the source that supplied it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveDensity {
    pub density: Density,
    pub source: DensitySource,
}

/// Resolve the density to use for a weighable item.
///
/// Priority: template override, then category default, then the system
/// default of 0.95 g/mL.
pub fn effective_density(
    template_override: Option<Density>,
    category_default: Option<Density>,
) -> EffectiveDensity {
    if let Some(density) = template_override {
        return EffectiveDensity {
            density,
            source: DensitySource::Template,
        };
    }
    if let Some(density) = category_default {
        return EffectiveDensity {
            density,
            source: DensitySource::Category,
        };
    }
    EffectiveDensity {
        density: Density::STANDARD,
        source: DensitySource::System,
    }
}

/// Tare and full weights for one item's bottle, used to turn scale
/// readings into on-hand volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottleTemplate {
    pub item_id: ItemId,
    pub empty_weight_g: Decimal,
    pub full_weight_g: Decimal,
    pub container_ml: Decimal,
    pub density_override: Option<Density>,
}

/// Weight of a full bottle: tare plus the liquid's mass.
pub fn full_weight_g(empty_weight_g: Decimal, container_ml: Decimal, density: Density) -> Decimal {
    empty_weight_g + ml_to_g(container_ml, density)
}

/// Tare weight recovered from a full-bottle weight. Exact inverse of
/// [`full_weight_g`].
pub fn empty_weight_g(full_weight_g: Decimal, container_ml: Decimal, density: Density) -> Decimal {
    full_weight_g - ml_to_g(container_ml, density)
}
