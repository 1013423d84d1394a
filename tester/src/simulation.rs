//! One full start/stop run of a company against reference collaborators

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use company::{Company, WeldingSolver};
use producer::{AsyncProducer, QuoteBook, SyncProducer};
use shared::{component_debug, component_info, component_warn, logging, ComponentId, MaterialId};

use crate::config::SimulationConfig;
use crate::customers::ScriptedCustomer;

/// What a simulation observed, from the customers' side and the company's
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,

    pub orders_issued: usize,
    pub orders_completed: usize,
    /// Completed orders where every item received a cost
    pub orders_fully_priced: usize,
    /// Completions for an order id that had already come back
    pub duplicate_completions: usize,
    pub orders_abandoned: usize,
    /// Orders lost with a pricing worker that failed while holding them
    pub orders_dropped: usize,
    pub total_cost: f64,

    pub quote_requests: usize,
    pub async_deliveries: usize,
    pub worker_failures: Vec<String>,
}

impl SimulationReport {
    /// Every issued order came back exactly once and no worker failed
    pub fn is_clean(&self) -> bool {
        self.worker_failures.is_empty()
            && self.orders_abandoned == 0
            && self.orders_dropped == 0
            && self.duplicate_completions == 0
            && self.orders_completed == self.orders_issued
    }
}

/// Build every collaborator from `config`, run the company to completion and
/// collect a report
pub async fn run_simulation(config: SimulationConfig) -> Result<SimulationReport> {
    config.validate()?;

    let started_at = Utc::now();
    let clock = Instant::now();
    let materials: Vec<MaterialId> = (1..=config.materials).map(MaterialId).collect();

    logging::log_startup(
        &ComponentId::Tester,
        &format!(
            "simulation: {} customers x {} orders, {} sync + {} async producers, {} workers",
            config.customers,
            config.orders_per_customer,
            config.sync_producers,
            config.async_producers,
            config.workers
        ),
    );

    let mut company = Company::new(config.company.clone(), WeldingSolver::new())?;

    let mut sync_producers = Vec::with_capacity(config.sync_producers);
    for index in 0..config.sync_producers {
        let book = QuoteBook::random(config.seed.wrapping_add(index as u64), &materials, config.shapes_per_material)?;
        let producer = Arc::new(SyncProducer::new(format!("sync_{index}"), book));
        company.register_producer(producer.clone())?;
        sync_producers.push(producer);
    }

    let mut async_producers = Vec::with_capacity(config.async_producers);
    for index in 0..config.async_producers {
        let seed = config.seed.wrapping_add(1_000 + index as u64);
        let book = QuoteBook::random(seed, &materials, config.shapes_per_material)?;
        let producer = Arc::new(
            AsyncProducer::new(format!("async_{index}"), book)
                .with_delay(config.async_delay())
                .with_repeat(config.async_repeat),
        );
        producer.start().await?;
        company.register_producer(producer.clone())?;
        async_producers.push(producer);
    }

    let customers: Vec<Arc<ScriptedCustomer>> = (0..config.customers)
        .map(|index| {
            let seed = config.seed.wrapping_add(10_000 + index as u64);
            Arc::new(
                ScriptedCustomer::random(seed, config.orders_per_customer, &materials, config.items_per_order)
                    .with_demand_delay(config.demand_delay()),
            )
        })
        .collect();
    for customer in &customers {
        company.register_customer(customer.clone())?;
    }

    company.start(config.workers).await?;
    let shutdown = company.stop().await.context("stopping company")?;

    let mut async_deliveries = 0;
    for producer in &async_producers {
        async_deliveries += producer.stop().await?.deliveries;
    }

    let quote_requests = sync_producers.iter().map(|p| p.requests()).sum::<usize>()
        + async_producers.iter().map(|p| p.requests()).sum::<usize>();

    let mut seen = HashSet::new();
    let mut report = SimulationReport {
        started_at,
        elapsed_ms: 0,
        orders_issued: customers.iter().map(|c| c.issued().len()).sum(),
        orders_completed: 0,
        orders_fully_priced: 0,
        duplicate_completions: 0,
        orders_abandoned: shutdown.orders_abandoned,
        orders_dropped: shutdown.orders_dropped,
        total_cost: 0.0,
        quote_requests,
        async_deliveries,
        worker_failures: shutdown
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.worker, f.error))
            .collect(),
    };

    for customer in &customers {
        for order in customer.completed().await {
            if !seen.insert(order.id) {
                report.duplicate_completions += 1;
                continue;
            }
            report.orders_completed += 1;
            if let Some(cost) = order.total_cost() {
                report.orders_fully_priced += 1;
                report.total_cost += cost;
            }
        }
    }
    report.elapsed_ms = clock.elapsed().as_millis();

    component_debug!(ComponentId::Tester, "Quote requests: {}", report.quote_requests);
    if report.is_clean() {
        component_info!(
            ComponentId::Tester,
            "✅ {} orders priced in {} ms, total cost {:.2}",
            report.orders_completed,
            report.elapsed_ms,
            report.total_cost
        );
    } else {
        component_warn!(
            ComponentId::Tester,
            "⚠️ {}/{} orders completed, {} failures",
            report.orders_completed,
            report.orders_issued,
            report.worker_failures.len()
        );
    }

    Ok(report)
}
