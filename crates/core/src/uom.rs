//! Units of measure and exact conversions between them.
//!
//! Quantities are `rust_decimal::Decimal` throughout so conversion round
//! trips are exact. Volume-tracked items resolve to millilitres as the base
//! unit; countable items use `Units`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Millilitres per US fluid ounce.
pub const ML_PER_OZ: Decimal = dec!(29.5735);

/// Millilitres per litre.
pub const ML_PER_L: Decimal = dec!(1000);

/// Unit of measure attached to a recorded quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Uom {
    /// Discrete countable units (bottles, cans, each).
    Units,
    /// US fluid ounces.
    Oz,
    /// Millilitres.
    Ml,
    /// Litres.
    L,
    /// Grams. Converts to volume only through a [`Density`].
    G,
}

impl Uom {
    /// Whether quantities in this unit need a density to reach base volume.
    pub fn is_weight(&self) -> bool {
        matches!(self, Uom::G)
    }
}

impl core::fmt::Display for Uom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Uom::Units => "units",
            Uom::Oz => "oz",
            Uom::Ml => "ml",
            Uom::L => "l",
            Uom::G => "g",
        };
        f.write_str(s)
    }
}

pub fn oz_to_ml(oz: Decimal) -> Decimal {
    oz * ML_PER_OZ
}

pub fn ml_to_oz(ml: Decimal) -> Decimal {
    ml / ML_PER_OZ
}

pub fn l_to_ml(l: Decimal) -> Decimal {
    l * ML_PER_L
}

pub fn ml_to_l(ml: Decimal) -> Decimal {
    ml / ML_PER_L
}

/// Mass of a volume of liquid at the given density.
pub fn ml_to_g(ml: Decimal, density: Density) -> Decimal {
    ml * density.value()
}

/// Volume occupied by a mass of liquid at the given density.
pub fn g_to_ml(g: Decimal, density: Density) -> Decimal {
    // Density construction guarantees a non-zero divisor.
    g / density.value()
}

/// Density of a liquid in grams per millilitre.
///
/// Construction validates the inclusive range [0.5, 2.0]; out-of-range
/// values are rejected, never clamped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Density(Decimal);

impl Density {
    /// Fallback applied when neither the item nor its category carries one.
    pub const STANDARD: Density = Density(dec!(0.95));

    pub const MIN: Decimal = dec!(0.5);
    pub const MAX: Decimal = dec!(2.0);

    pub fn try_new(value: Decimal) -> DomainResult<Self> {
        if value < Self::MIN || value > Self::MAX {
            return Err(DomainError::validation(format!(
                "density {value} g/ml outside allowed range [{}, {}]",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Density {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
