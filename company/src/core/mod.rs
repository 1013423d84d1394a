//! Core coordination primitives
//!
//! The catalog and the demand queue are the two monitors the workers block
//! on. Neither performs I/O; all waiting is on tokio synchronization types.

pub mod catalog;
pub mod queue;

pub use catalog::{CatalogEntry, EntryStatus, PriceCatalog, PriceListSink, SharedCatalog};
pub use queue::DemandQueue;
