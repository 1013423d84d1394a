//! Simulation harness for the welding company
//!
//! Wires reference producers and scripted customers into a `Company` running
//! the `WeldingSolver`, drives one full start/stop cycle and reports what
//! happened.
//!
//! ```no_run
//! use tester::{run_simulation, SimulationConfig};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = SimulationConfig::builder()
//!     .customers(8)
//!     .orders_per_customer(25)
//!     .workers(4)
//!     .build();
//!
//! let report = run_simulation(config).await?;
//! assert!(report.is_clean());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod customers;
pub mod simulation;

pub use config::{SimulationConfig, SimulationConfigBuilder};
pub use customers::ScriptedCustomer;
pub use simulation::{run_simulation, SimulationReport};
