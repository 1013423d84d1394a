//! Shared types for the welding company pricing pipeline
//!
//! Contains the data model exchanged between the company, its producers
//! and its customers, plus the logging setup every binary uses.

pub mod errors;
pub mod logging;
pub mod types;
pub mod validation;

pub use errors::*;
pub use logging::ComponentId;
pub use types::*;
