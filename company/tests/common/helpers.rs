//! Test doubles and helpers for company tests
//!
//! Producers, customers and solvers here implement the company traits
//! directly so scenarios can control delivery timing precisely.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use company::{Company, CompanyConfig, CompanyError, CompanyResult, Customer, PriceListSink, Producer, Solver};
use shared::{CustomerId, MaterialId, Order, OrderId, PriceList, ProducerId};

/// Answers inside `request_price_list`, before the request returns
pub struct InstantProducer {
    id: ProducerId,
    quotes: HashMap<MaterialId, PriceList>,
    requests: AtomicUsize,
    accepted: AtomicUsize,
}

impl InstantProducer {
    pub fn new(quotes: Vec<PriceList>) -> Self {
        Self::with_id(ProducerId::new(), quotes)
    }

    pub fn with_id(id: ProducerId, quotes: Vec<PriceList>) -> Self {
        Self {
            id,
            quotes: quotes.into_iter().map(|q| (q.material, q)).collect(),
            requests: AtomicUsize::new(0),
            accepted: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Submissions the company counted as new contributions
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Producer for InstantProducer {
    fn id(&self) -> ProducerId {
        self.id.clone()
    }

    async fn request_price_list(&self, material: MaterialId, sink: PriceListSink) {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(quotes) = self.quotes.get(&material) {
            if let Ok(true) = sink.submit(&self.id, quotes.clone()).await {
                self.accepted.fetch_add(1, Ordering::SeqCst);
            }
        }
    }
}

/// Answers from a separate task after a delay, optionally more than once
pub struct DelayedProducer {
    id: ProducerId,
    quotes: Arc<HashMap<MaterialId, PriceList>>,
    delay: Duration,
    deliveries: usize,
}

impl DelayedProducer {
    pub fn new(quotes: Vec<PriceList>, delay: Duration) -> Self {
        Self {
            id: ProducerId::new(),
            quotes: Arc::new(quotes.into_iter().map(|q| (q.material, q)).collect()),
            delay,
            deliveries: 1,
        }
    }

    pub fn with_deliveries(mut self, deliveries: usize) -> Self {
        self.deliveries = deliveries;
        self
    }
}

#[async_trait::async_trait]
impl Producer for DelayedProducer {
    fn id(&self) -> ProducerId {
        self.id.clone()
    }

    async fn request_price_list(&self, material: MaterialId, sink: PriceListSink) {
        let id = self.id.clone();
        let quotes = Arc::clone(&self.quotes);
        let delay = self.delay;
        let deliveries = self.deliveries;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(list) = quotes.get(&material) {
                for _ in 0..deliveries {
                    let _ = sink.submit(&id, list.clone()).await;
                }
            }
        });
    }
}

/// Hands out a fixed list of orders and records what comes back
pub struct RecordingCustomer {
    id: CustomerId,
    demand: Mutex<VecDeque<Order>>,
    completed: Mutex<Vec<Order>>,
    demand_delay: Option<Duration>,
}

impl RecordingCustomer {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            id: CustomerId::new(),
            demand: Mutex::new(orders.into()),
            completed: Mutex::new(Vec::new()),
            demand_delay: None,
        }
    }

    pub fn with_demand_delay(mut self, delay: Duration) -> Self {
        self.demand_delay = Some(delay);
        self
    }

    pub async fn completed(&self) -> Vec<Order> {
        self.completed.lock().await.clone()
    }

    pub async fn completed_ids(&self) -> Vec<OrderId> {
        self.completed.lock().await.iter().map(|o| o.id).collect()
    }
}

#[async_trait::async_trait]
impl Customer for RecordingCustomer {
    fn id(&self) -> CustomerId {
        self.id.clone()
    }

    async fn next_demand(&self) -> Option<Order> {
        if let Some(delay) = self.demand_delay {
            tokio::time::sleep(delay).await;
        }
        self.demand.lock().await.pop_front()
    }

    async fn on_completed(&self, order: Order) {
        self.completed.lock().await.push(order);
    }
}

/// Where a `PanickingCustomer` blows up
#[derive(Clone, Copy, Debug)]
pub enum PanicAt {
    /// First `next_demand` call, inside the intake worker
    Demand,
    /// `on_completed`, inside whichever pricing worker priced the order
    Completion,
}

/// Customer whose callback panics, to exercise worker crash handling
pub struct PanickingCustomer {
    id: CustomerId,
    at: PanicAt,
    demand: Mutex<VecDeque<Order>>,
}

impl PanickingCustomer {
    pub fn new(at: PanicAt, orders: Vec<Order>) -> Self {
        Self {
            id: CustomerId::new(),
            at,
            demand: Mutex::new(orders.into()),
        }
    }
}

#[async_trait::async_trait]
impl Customer for PanickingCustomer {
    fn id(&self) -> CustomerId {
        self.id.clone()
    }

    async fn next_demand(&self) -> Option<Order> {
        if let PanicAt::Demand = self.at {
            panic!("customer failed while producing demand");
        }
        self.demand.lock().await.pop_front()
    }

    async fn on_completed(&self, order: Order) {
        if let PanicAt::Completion = self.at {
            panic!("customer failed while accepting order {}", order.id);
        }
    }
}

/// Prices each item at the quoted cost of its exact (or rotated) sheet
#[derive(Default)]
pub struct CountingSolver {
    calls: AtomicUsize,
}

impl CountingSolver {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Solver for CountingSolver {
    fn solve(&self, orders: &mut [Order], price_list: &PriceList) -> CompanyResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for order in orders.iter_mut() {
            for item in order.items.iter_mut() {
                item.cost = price_list.cost_of(&item.shape);
            }
        }
        Ok(())
    }
}

/// Fails every batch
pub struct FailingSolver;

impl Solver for FailingSolver {
    fn solve(&self, orders: &mut [Order], _price_list: &PriceList) -> CompanyResult<()> {
        let material = orders.first().map(|o| o.material).unwrap_or(MaterialId(0));
        Err(CompanyError::solver(material, "injected failure"))
    }
}

/// Common test operations
pub struct TestHelpers;

impl TestHelpers {
    pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn company() -> Company<CountingSolver> {
        Company::new(CompanyConfig::default(), CountingSolver::default()).unwrap()
    }

    pub fn company_with_config(config: CompanyConfig) -> Company<CountingSolver> {
        Company::new(config, CountingSolver::default()).unwrap()
    }

    /// Poll until every intake worker has signed off
    pub async fn wait_for_intake<S: Solver + 'static>(company: &Company<S>) {
        tokio::time::timeout(Self::TEST_TIMEOUT, async {
            while company.active_customers().await > 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("intake workers did not finish");
    }

    /// Every issued order came back exactly once, priced
    pub async fn assert_each_completed_once(customers: &[Arc<RecordingCustomer>], issued: &HashSet<OrderId>) {
        let mut seen = HashSet::new();
        for customer in customers {
            for order in customer.completed().await {
                assert!(order.is_priced(), "order {} came back unpriced", order.id);
                assert!(seen.insert(order.id), "order {} completed twice", order.id);
            }
        }
        assert_eq!(&seen, issued);
    }
}
