//! Pricing module (effective-dated unit costs).
//!
//! Pure domain logic only: no IO, no persistence concerns.

pub mod history;

pub use history::{
    Currency, EntryMode, PriceEntry, PriceHistoryRecord, PriceTerms, PriceTimeline, ResolvedCost,
};
