//! Main company implementation
//!
//! The company owns the price catalog, the demand queue and the lifetimes of
//! every worker. Producers and customers are registered up front; `start`
//! launches one intake worker per customer plus the pricing pool, and `stop`
//! waits for demand to dry up and the queue to drain.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::task::JoinHandle;

use shared::logging::{self, ComponentId};
use shared::{component_debug, component_warn, MaterialId, PriceList, ProducerId};

use crate::config::CompanyConfig;
use crate::core::{DemandQueue, EntryStatus, PriceListSink, SharedCatalog};
use crate::error::{CompanyError, CompanyResult};
use crate::traits::{Customer, Producer, Solver};
use crate::workers::{
    run_intake_worker, run_pricing_worker, DemandEntry, IntakeSummary, OrderCounters, PricingLimits,
    PricingSummary,
};

/// A worker that ended with an error instead of a summary
#[derive(Debug)]
pub struct WorkerFailure {
    pub worker: ComponentId,
    pub error: CompanyError,
}

/// Outcome of a completed `stop`
///
/// Every accepted order ends up in exactly one of `orders_completed`,
/// `orders_abandoned` or `orders_dropped`.
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Summaries of workers that exited normally
    pub intake: Vec<IntakeSummary>,
    pub pricing: Vec<PricingSummary>,
    pub failures: Vec<WorkerFailure>,

    pub orders_accepted: usize,
    /// Orders handed back through `on_completed`
    pub orders_completed: usize,
    /// Orders still queued because every pricing worker had failed
    pub orders_abandoned: usize,
    /// Orders a failing pricing worker was holding when it stopped
    pub orders_dropped: usize,
}

impl ShutdownReport {
    /// No worker failed and nothing was left behind
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.orders_abandoned == 0 && self.orders_dropped == 0
    }
}

/// Worker handles still to be joined, with the report built so far
///
/// Handles are removed only once joined, so a `stop` that is cancelled
/// part-way can be resumed and `Drop` can still abort what is left.
struct RunningWorkers {
    intake: VecDeque<(usize, JoinHandle<IntakeSummary>)>,
    pricing: VecDeque<(usize, JoinHandle<CompanyResult<PricingSummary>>)>,
    /// Crashed intake workers whose customer is not yet signed off
    unsigned_customers: usize,
    report: ShutdownReport,
}

impl RunningWorkers {
    async fn join(&mut self, queue: &DemandQueue<DemandEntry>, catalog: &SharedCatalog) {
        while let Some((worker_id, handle)) = self.intake.front_mut() {
            let worker_id = *worker_id;
            let joined = handle.await;
            self.intake.pop_front();

            match joined {
                Ok(summary) => self.report.intake.push(summary),
                Err(e) => {
                    self.unsigned_customers += 1;
                    self.report.failures.push(WorkerFailure {
                        worker: ComponentId::IntakeWorker(worker_id),
                        error: e.into(),
                    });
                }
            }
        }

        // a crashed intake worker never signed off its customer
        while self.unsigned_customers > 0 {
            queue.supplier_finished().await;
            self.unsigned_customers -= 1;
        }

        component_debug!(
            ComponentId::Company,
            "All intake workers joined, waiting on {} pricing workers",
            self.pricing.len()
        );
        queue.wake_all();
        catalog.wake_all();

        while let Some((worker_id, handle)) = self.pricing.front_mut() {
            let worker_id = *worker_id;
            let joined = handle.await;
            self.pricing.pop_front();

            match joined.map_err(CompanyError::from).and_then(|result| result) {
                Ok(summary) => self.report.pricing.push(summary),
                Err(error) => self.report.failures.push(WorkerFailure {
                    worker: ComponentId::PricingWorker(worker_id),
                    error,
                }),
            }
        }
    }

    fn abort(&self) {
        for (_, handle) in self.intake.iter() {
            handle.abort();
        }
        for (_, handle) in self.pricing.iter() {
            handle.abort();
        }
    }
}

enum Phase {
    Configuring,
    Running(RunningWorkers),
    /// `stop` has begun joining workers but has not finished
    Stopping(RunningWorkers),
    Stopped,
}

/// Coordinator tying producers, customers and the pricing pool together
pub struct Company<S>
where
    S: Solver + 'static,
{
    config: CompanyConfig,
    solver: Arc<S>,

    /// Shared monitors
    catalog: Arc<SharedCatalog>,
    queue: Arc<DemandQueue<DemandEntry>>,
    counters: Arc<OrderCounters>,

    /// Registered collaborators (frozen at start)
    producers: Vec<Arc<dyn Producer>>,
    customers: Vec<Arc<dyn Customer>>,

    phase: Phase,
}

impl<S> Company<S>
where
    S: Solver + 'static,
{
    /// Create a company with an injected solver
    pub fn new(config: CompanyConfig, solver: S) -> CompanyResult<Self> {
        config.validate()?;

        Ok(Self {
            config,
            solver: Arc::new(solver),
            catalog: Arc::new(SharedCatalog::new()),
            queue: Arc::new(DemandQueue::new()),
            counters: Arc::new(OrderCounters::default()),
            producers: Vec::new(),
            customers: Vec::new(),
            phase: Phase::Configuring,
        })
    }

    pub fn register_producer(&mut self, producer: Arc<dyn Producer>) -> CompanyResult<()> {
        self.ensure_configuring()?;

        let producer_id = producer.id();
        if self.producers.iter().any(|p| p.id() == producer_id) {
            return Err(CompanyError::DuplicateProducer { producer_id });
        }

        component_debug!(ComponentId::Company, "🏭 Registered producer {}", producer_id);
        self.producers.push(producer);
        Ok(())
    }

    pub fn register_customer(&mut self, customer: Arc<dyn Customer>) -> CompanyResult<()> {
        self.ensure_configuring()?;

        let customer_id = customer.id();
        if self.customers.iter().any(|c| c.id() == customer_id) {
            return Err(CompanyError::DuplicateCustomer { customer_id });
        }

        component_debug!(ComponentId::Company, "🧾 Registered customer {}", customer_id);
        self.customers.push(customer);
        Ok(())
    }

    /// Handle producers use to deliver quotes from any task
    pub fn price_sink(&self) -> PriceListSink {
        PriceListSink::new(Arc::clone(&self.catalog))
    }

    /// Merge a producer's quotes into the catalog and wake all pricing workers
    ///
    /// # Returns
    /// `true` for a new contribution, `false` for a repeated one
    pub async fn submit_price_list(&self, producer: &ProducerId, quotes: PriceList) -> CompanyResult<bool> {
        self.catalog.submit(producer, &quotes).await
    }

    /// Launch the intake workers and a pricing pool of `worker_count` tasks
    pub async fn start(&mut self, worker_count: usize) -> CompanyResult<()> {
        if !matches!(self.phase, Phase::Configuring) {
            return Err(CompanyError::AlreadyStarted);
        }
        if worker_count == 0 {
            return Err(CompanyError::config("worker_count must be at least 1"));
        }

        logging::log_startup(
            &ComponentId::Company,
            &format!(
                "{} pricing workers for {} customers and {} producers",
                worker_count,
                self.customers.len(),
                self.producers.len()
            ),
        );

        let roster: HashSet<ProducerId> = self.producers.iter().map(|p| p.id()).collect();
        self.catalog.set_roster(roster).await;
        self.queue.open(self.customers.len()).await;

        let limits = PricingLimits {
            stall_warning_interval: self.config.stall_warning_interval,
            readiness_timeout: self.config.readiness_timeout,
        };

        let pricing = (0..worker_count)
            .map(|worker_id| {
                let handle = tokio::spawn(run_pricing_worker(
                    worker_id,
                    Arc::clone(&self.solver),
                    Arc::clone(&self.catalog),
                    Arc::clone(&self.queue),
                    Arc::clone(&self.counters),
                    limits,
                ));
                (worker_id, handle)
            })
            .collect();

        let producers: Arc<[Arc<dyn Producer>]> = self.producers.iter().cloned().collect();
        let intake = self
            .customers
            .iter()
            .enumerate()
            .map(|(worker_id, customer)| {
                let handle = tokio::spawn(run_intake_worker(
                    worker_id,
                    Arc::clone(customer),
                    Arc::clone(&producers),
                    self.price_sink(),
                    Arc::clone(&self.queue),
                    Arc::clone(&self.counters),
                ));
                (worker_id, handle)
            })
            .collect();

        self.phase = Phase::Running(RunningWorkers {
            intake,
            pricing,
            unsigned_customers: 0,
            report: ShutdownReport::default(),
        });
        Ok(())
    }

    /// Wait for all demand to be taken in and every pricing worker to exit
    ///
    /// Intake workers are joined first; then both monitors are broadcast so
    /// idle pricing workers observe termination. A worker blocked on a catalog
    /// entry that never completes keeps this call waiting unless
    /// `readiness_timeout` is configured. Cancelling the returned future leaves
    /// the company stopping; calling `stop` again resumes the joins.
    pub async fn stop(&mut self) -> CompanyResult<ShutdownReport> {
        match std::mem::replace(&mut self.phase, Phase::Stopped) {
            Phase::Running(workers) | Phase::Stopping(workers) => self.phase = Phase::Stopping(workers),
            Phase::Configuring => {
                self.phase = Phase::Configuring;
                return Err(CompanyError::NotStarted);
            }
            Phase::Stopped => return Err(CompanyError::AlreadyStopped),
        }

        if let Phase::Stopping(workers) = &mut self.phase {
            workers.join(&self.queue, &self.catalog).await;
        }

        let Phase::Stopping(workers) = std::mem::replace(&mut self.phase, Phase::Stopped) else {
            return Err(CompanyError::AlreadyStopped);
        };
        let mut report = workers.report;

        report.orders_accepted = self.counters.accepted();
        report.orders_completed = self.counters.completed();
        report.orders_abandoned = self.queue.len().await;
        report.orders_dropped = report
            .orders_accepted
            .saturating_sub(report.orders_completed + report.orders_abandoned);

        if report.is_clean() {
            logging::log_shutdown(
                &ComponentId::Company,
                &format!("{} orders priced", report.orders_completed),
            );
        } else {
            component_warn!(
                ComponentId::Company,
                "⚠️ Stopped with {} worker failures, {} abandoned and {} dropped orders",
                report.failures.len(),
                report.orders_abandoned,
                report.orders_dropped
            );
        }
        Ok(report)
    }

    fn ensure_configuring(&self) -> CompanyResult<()> {
        match self.phase {
            Phase::Configuring => Ok(()),
            _ => Err(CompanyError::AlreadyStarted),
        }
    }

    /// Customers whose intake worker has not finished yet
    pub async fn active_customers(&self) -> usize {
        self.queue.active_suppliers().await
    }

    /// Orders waiting for a pricing worker
    pub async fn pending_orders(&self) -> usize {
        self.queue.len().await
    }

    pub async fn catalog_status(&self, material: MaterialId) -> Option<EntryStatus> {
        self.catalog.status(material).await
    }

    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Started and not yet fully stopped
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_) | Phase::Stopping(_))
    }
}

impl<S> Drop for Company<S>
where
    S: Solver + 'static,
{
    fn drop(&mut self) {
        if let Phase::Running(workers) | Phase::Stopping(workers) = &self.phase {
            component_warn!(ComponentId::Company, "Dropped while running; aborting workers");
            workers.abort();
        }
    }
}
