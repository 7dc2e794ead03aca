//! Stock ledger module (movement events, counting sessions).
//!
//! This crate contains business rules for stock movement, implemented purely
//! as deterministic domain logic (no IO, no storage).

pub mod event;
pub mod session;

pub use event::{Adjustment, Consumption, EventSource, Receipt, StockEvent};
pub use session::{CountingSession, SessionLine};
