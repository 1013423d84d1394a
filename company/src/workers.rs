//! Intake and pricing worker loops
//!
//! Intake workers (one per customer) turn demand into price requests and
//! queued work. Pricing workers (fixed pool) take queued orders, wait for the
//! material's catalog entry to complete, run the solver and hand the order
//! back to its customer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared::{component_debug, component_error, component_info, ComponentId, CustomerId, Order};

use crate::core::{DemandQueue, PriceListSink, SharedCatalog};
use crate::error::{CompanyError, CompanyResult};
use crate::traits::{Customer, Producer, Solver};

/// One accepted order paired with the customer waiting for it
pub struct DemandEntry {
    pub order: Order,
    pub customer: Arc<dyn Customer>,
}

/// What an intake worker did before its customer ran out of demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeSummary {
    pub worker_id: usize,
    pub customer_id: CustomerId,
    pub orders_accepted: usize,
}

/// What a pricing worker did before the queue drained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingSummary {
    pub worker_id: usize,
    pub orders_priced: usize,
}

/// Pipeline-wide order tallies that survive a worker dying mid-run
#[derive(Debug, Default)]
pub(crate) struct OrderCounters {
    accepted: AtomicUsize,
    completed: AtomicUsize,
}

impl OrderCounters {
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Timing knobs handed to each pricing worker
#[derive(Debug, Clone, Copy)]
pub(crate) struct PricingLimits {
    pub stall_warning_interval: Duration,
    pub readiness_timeout: Option<Duration>,
}

pub(crate) async fn run_intake_worker(
    worker_id: usize,
    customer: Arc<dyn Customer>,
    producers: Arc<[Arc<dyn Producer>]>,
    sink: PriceListSink,
    queue: Arc<DemandQueue<DemandEntry>>,
    counters: Arc<OrderCounters>,
) -> IntakeSummary {
    let component = ComponentId::IntakeWorker(worker_id);
    let customer_id = customer.id();
    let mut orders_accepted = 0;

    component_debug!(component, "Serving customer {}", customer_id);

    while let Some(order) = customer.next_demand().await {
        let material = order.material;

        for producer in producers.iter() {
            producer.request_price_list(material, sink.clone()).await;
        }

        component_debug!(
            component,
            "📦 Queued order {} for {} ({} items)",
            order.id,
            material,
            order.items.len()
        );
        queue
            .push(DemandEntry {
                order,
                customer: Arc::clone(&customer),
            })
            .await;
        counters.accepted.fetch_add(1, Ordering::SeqCst);
        orders_accepted += 1;
    }

    let remaining = queue.supplier_finished().await;
    component_info!(
        component,
        "Customer {} finished after {} orders ({} customers still active)",
        customer_id,
        orders_accepted,
        remaining
    );

    IntakeSummary {
        worker_id,
        customer_id,
        orders_accepted,
    }
}

pub(crate) async fn run_pricing_worker<S>(
    worker_id: usize,
    solver: Arc<S>,
    catalog: Arc<SharedCatalog>,
    queue: Arc<DemandQueue<DemandEntry>>,
    counters: Arc<OrderCounters>,
    limits: PricingLimits,
) -> CompanyResult<PricingSummary>
where
    S: Solver + 'static,
{
    let component = ComponentId::PricingWorker(worker_id);
    let mut orders_priced = 0;

    while let Some(DemandEntry { order, customer }) = queue.pop().await {
        let order_id = order.id;
        match price_order(&component, &solver, &catalog, order, limits).await {
            Ok(priced) => {
                customer.on_completed(priced).await;
                counters.completed.fetch_add(1, Ordering::SeqCst);
                orders_priced += 1;
            }
            Err(e) => {
                component_error!(component, "❌ Order {} dropped, worker stopping: {}", order_id, e);
                return Err(e);
            }
        }
    }

    component_debug!(component, "Queue drained after {} orders", orders_priced);
    Ok(PricingSummary {
        worker_id,
        orders_priced,
    })
}

async fn price_order<S>(
    component: &ComponentId,
    solver: &Arc<S>,
    catalog: &SharedCatalog,
    order: Order,
    limits: PricingLimits,
) -> CompanyResult<Order>
where
    S: Solver + 'static,
{
    let material = order.material;
    let price_list = catalog
        .await_ready(
            material,
            component,
            limits.stall_warning_interval,
            limits.readiness_timeout,
        )
        .await?;

    let solver = Arc::clone(solver);
    let (mut batch, outcome) = tokio::task::spawn_blocking(move || {
        let mut batch = vec![order];
        let outcome = solver.solve(&mut batch, &price_list);
        (batch, outcome)
    })
    .await?;
    outcome?;

    batch
        .pop()
        .ok_or_else(|| CompanyError::solver(material, "solver discarded the order"))
}
