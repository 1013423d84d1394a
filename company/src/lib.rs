//! Welding company pricing pipeline
//!
//! The company accepts demand from many customers and price quotes from many
//! producers, merges each material's quotes exactly once per producer, and
//! prices every order against the complete merged list on a fixed worker pool.

pub mod company;
pub mod config;
pub mod core;
pub mod error;
pub mod solver;
pub mod traits;
pub mod workers;

// Re-export commonly used types
pub use company::{Company, ShutdownReport, WorkerFailure};
pub use config::CompanyConfig;
pub use core::{EntryStatus, PriceListSink};
pub use error::{CompanyError, CompanyResult};
pub use solver::WeldingSolver;
pub use traits::{Customer, Producer, Solver};
pub use workers::{IntakeSummary, PricingSummary};
