//! Demand queue between intake workers and the pricing pool
//!
//! A multiset of pending work plus the count of suppliers (customers) that may
//! still add to it. Both live under one lock so "empty and nobody left to
//! push" is observed atomically by the pricing workers.

use std::collections::VecDeque;
use std::pin::pin;
use tokio::sync::{Mutex, Notify};

#[derive(Debug)]
struct QueueState<T> {
    items: VecDeque<T>,
    active_suppliers: usize,
}

/// Unbounded handoff with blocking pop and supplier-driven termination
#[derive(Debug)]
pub struct DemandQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Notify,
}

impl<T> Default for DemandQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DemandQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                active_suppliers: 0,
            }),
            available: Notify::new(),
        }
    }

    /// Declare how many suppliers will push before the queue can drain for good
    pub async fn open(&self, suppliers: usize) {
        self.state.lock().await.active_suppliers = suppliers;
        self.available.notify_waiters();
    }

    /// Enqueue one item and wake one waiting consumer
    pub async fn push(&self, item: T) {
        self.state.lock().await.items.push_back(item);
        self.available.notify_one();
    }

    /// A supplier has finished; the last one wakes every consumer
    pub async fn supplier_finished(&self) -> usize {
        let remaining = {
            let mut state = self.state.lock().await;
            state.active_suppliers = state.active_suppliers.saturating_sub(1);
            state.active_suppliers
        };

        if remaining == 0 {
            self.available.notify_waiters();
        }
        remaining
    }

    /// Wait for an item
    ///
    /// # Returns
    /// `Some(item)` as soon as one is available, `None` once the queue is
    /// empty and no supplier remains active
    pub async fn pop(&self) -> Option<T> {
        loop {
            let mut available = pin!(self.available.notified());
            available.as_mut().enable();

            {
                let mut state = self.state.lock().await;
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.active_suppliers == 0 {
                    return None;
                }
            }

            available.await;
        }
    }

    /// Wake every consumer so it re-checks the termination condition
    pub fn wake_all(&self) {
        self.available.notify_waiters();
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.items.is_empty()
    }

    pub async fn active_suppliers(&self) -> usize {
        self.state.lock().await.active_suppliers
    }
}
