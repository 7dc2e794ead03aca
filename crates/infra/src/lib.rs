//! Infrastructure layer: in-memory stores behind the report source traits.
//!
//! Each store is an `RwLock` over owned collections and implements the
//! corresponding read trait from `barstock-reports`, so a database-backed
//! implementation can replace any of them without touching report code.

pub mod stores;


pub use stores::{MemoryCatalog, MemoryLedger, MemoryPriceBook, MemorySessions};
