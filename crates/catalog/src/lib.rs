//! Catalog module (items, categories, keg sizes, bottle templates).
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod container;
pub mod item;

pub use container::{
    BottleTemplate, DensitySource, EffectiveDensity, KegSize, effective_density, empty_weight_g,
    full_weight_g,
};
pub use item::{Category, CountMethod, InventoryItem};
