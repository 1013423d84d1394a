//! Simulation runner
//!
//! Builds a welding company with reference producers and scripted customers,
//! runs it once and prints the report as JSON.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use shared::{logging, ComponentId};
use tester::{run_simulation, SimulationConfig};

/// Run the welding company pricing pipeline against simulated collaborators
#[derive(Parser)]
#[command(name = "tester")]
#[command(about = "Simulates customers and producers around a welding company")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of customers
    #[arg(long)]
    customers: Option<usize>,

    /// Number of producers that answer inline
    #[arg(long)]
    producers: Option<usize>,

    /// Number of producers that answer from a background task
    #[arg(long)]
    async_producers: Option<usize>,

    /// Orders per customer
    #[arg(long)]
    orders: Option<usize>,

    /// Number of distinct materials
    #[arg(long)]
    materials: Option<u32>,

    /// Pricing pool size
    #[arg(long)]
    workers: Option<usize>,

    /// Seed for quotes and orders
    #[arg(long)]
    seed: Option<u64>,

    /// Fail pricing workers stuck on a catalog entry for this long
    #[arg(long)]
    readiness_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_json_file(path)?,
            None => SimulationConfig::default(),
        };

        if let Some(customers) = self.customers {
            config.customers = customers;
        }
        if let Some(producers) = self.producers {
            config.sync_producers = producers;
        }
        if let Some(producers) = self.async_producers {
            config.async_producers = producers;
        }
        if let Some(orders) = self.orders {
            config.orders_per_customer = orders;
        }
        if let Some(materials) = self.materials {
            config.materials = materials;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(timeout) = self.readiness_timeout_ms {
            config.company.readiness_timeout = Some(Duration::from_millis(timeout));
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let args = Args::parse();
    logging::init_tracing_with_level(Some(&args.log_level));

    if let Err(e) = run(args).await {
        logging::log_error(&ComponentId::Tester, "Simulation", &e);
        return Err(e);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = args.into_config()?;
    let report = run_simulation(config).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_clean() {
        bail!(
            "{} of {} orders completed, {} abandoned, {} dropped, {} worker failures",
            report.orders_completed,
            report.orders_issued,
            report.orders_abandoned,
            report.orders_dropped,
            report.worker_failures.len()
        );
    }

    logging::log_success(&ComponentId::Tester, "Simulation finished cleanly");
    Ok(())
}
