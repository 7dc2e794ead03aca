//! `barstock-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod period;
pub mod uom;

pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, ItemId, LocationId, PriceRecordId, SessionId};
pub use period::Period;
pub use uom::{Density, Uom};
