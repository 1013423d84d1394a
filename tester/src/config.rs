//! Simulation configuration and builder

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use company::CompanyConfig;

/// Shape of one simulated run
///
/// Loadable from JSON; any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub customers: usize,
    pub sync_producers: usize,
    pub async_producers: usize,
    pub orders_per_customer: usize,
    pub items_per_order: usize,
    pub materials: u32,
    pub shapes_per_material: usize,
    pub workers: usize,
    pub seed: u64,

    /// Delay before an async producer answers, in milliseconds
    pub async_delay_ms: u64,
    /// How many times an async producer delivers each quote
    pub async_repeat: usize,
    /// Pause between a customer's demands, in milliseconds
    pub demand_delay_ms: u64,

    pub company: CompanyConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            customers: 4,
            sync_producers: 2,
            async_producers: 2,
            orders_per_customer: 10,
            items_per_order: 3,
            materials: 3,
            shapes_per_material: 4,
            workers: 4,
            seed: 7,
            async_delay_ms: 10,
            async_repeat: 2,
            demand_delay_ms: 0,
            company: CompanyConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::new()
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: SimulationConfig =
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.workers > 0, "workers must be at least 1");
        ensure!(self.materials > 0, "materials must be at least 1");
        ensure!(self.items_per_order > 0, "items_per_order must be at least 1");
        ensure!(self.shapes_per_material > 0, "shapes_per_material must be at least 1");
        ensure!(
            self.customers == 0 || self.sync_producers + self.async_producers > 0,
            "customers need at least one producer"
        );
        self.company.validate()?;
        Ok(())
    }

    pub fn async_delay(&self) -> Duration {
        Duration::from_millis(self.async_delay_ms)
    }

    pub fn demand_delay(&self) -> Option<Duration> {
        (self.demand_delay_ms > 0).then(|| Duration::from_millis(self.demand_delay_ms))
    }

    pub fn total_orders(&self) -> usize {
        self.customers * self.orders_per_customer
    }
}

pub struct SimulationConfigBuilder {
    config: SimulationConfig,
}

impl SimulationConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SimulationConfig::default(),
        }
    }

    pub fn customers(mut self, count: usize) -> Self {
        self.config.customers = count;
        self
    }

    pub fn sync_producers(mut self, count: usize) -> Self {
        self.config.sync_producers = count;
        self
    }

    pub fn async_producers(mut self, count: usize) -> Self {
        self.config.async_producers = count;
        self
    }

    pub fn orders_per_customer(mut self, count: usize) -> Self {
        self.config.orders_per_customer = count;
        self
    }

    pub fn items_per_order(mut self, count: usize) -> Self {
        self.config.items_per_order = count;
        self
    }

    pub fn materials(mut self, count: u32) -> Self {
        self.config.materials = count;
        self
    }

    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn async_delay(mut self, delay: Duration) -> Self {
        self.config.async_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn async_repeat(mut self, repeat: usize) -> Self {
        self.config.async_repeat = repeat;
        self
    }

    pub fn demand_delay(mut self, delay: Duration) -> Self {
        self.config.demand_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Fail pricing workers that wait longer than this for a catalog entry
    pub fn readiness_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.company = self.config.company.with_readiness_timeout_option(timeout);
        self
    }

    pub fn company(mut self, company: CompanyConfig) -> Self {
        self.config.company = company;
        self
    }

    pub fn build(self) -> SimulationConfig {
        self.config
    }
}

impl Default for SimulationConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
