//! Common test utilities and infrastructure
//!
//! This module provides shared test doubles, fixtures, and helpers
//! used across all company test suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{
    CountingSolver, DelayedProducer, FailingSolver, InstantProducer, PanicAt, PanickingCustomer,
    RecordingCustomer, TestHelpers,
};
