//! Scripted customers for simulations

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;

use company::Customer;
use shared::{CustomerId, MaterialId, Order, OrderId};

/// Largest side of a randomly generated sheet
const MAX_RANDOM_SIDE: u32 = 8;

/// Customer that issues a fixed list of orders and records the results
pub struct ScriptedCustomer {
    id: CustomerId,
    issued: Vec<OrderId>,
    demand: Mutex<VecDeque<Order>>,
    completed: Mutex<Vec<Order>>,
    demand_delay: Option<Duration>,
}

impl ScriptedCustomer {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            id: CustomerId::new(),
            issued: orders.iter().map(|o| o.id).collect(),
            demand: Mutex::new(orders.into()),
            completed: Mutex::new(Vec::new()),
            demand_delay: None,
        }
    }

    /// Reproducible orders spread over `materials`
    pub fn random(seed: u64, count: usize, materials: &[MaterialId], items_per_order: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let orders = (0..count)
            .filter_map(|_| {
                let material = *materials.get(rng.gen_range(0..materials.len().max(1)))?;
                let mut order = Order::new(material);
                for _ in 0..items_per_order {
                    let width = rng.gen_range(1..=MAX_RANDOM_SIDE);
                    let height = rng.gen_range(1..=MAX_RANDOM_SIDE);
                    let strength: f64 = rng.gen_range(0.1..1.0);
                    order = order.with_item(width, height, strength);
                }
                Some(order)
            })
            .collect();

        Self::new(orders)
    }

    pub fn with_demand_delay(mut self, delay: Option<Duration>) -> Self {
        self.demand_delay = delay;
        self
    }

    /// Ids of every order this customer will hand out, in order
    pub fn issued(&self) -> &[OrderId] {
        &self.issued
    }

    pub async fn completed(&self) -> Vec<Order> {
        self.completed.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.demand.lock().await.len()
    }
}

#[async_trait::async_trait]
impl Customer for ScriptedCustomer {
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
