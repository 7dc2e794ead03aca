//! In-memory store implementations.
//!
//! Intended for tests, demos, and single-process deployments. Every store is
//! safe to share behind an `Arc` and hands out owned copies, never lock
//! guards.

pub mod catalog;
pub mod ledger;
pub mod prices;
pub mod sessions;

pub use catalog::MemoryCatalog;
pub use ledger::MemoryLedger;
pub use prices::MemoryPriceBook;
pub use sessions::MemorySessions;
