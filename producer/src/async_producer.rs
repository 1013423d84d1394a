//! Producer that answers from a background task
//!
//! Requests are queued on an unbounded channel and return immediately. Once
//! `start` has been called, a dispatcher task picks them up and spawns one
//! delayed delivery per request. `stop` closes the channel, lets the
//! dispatcher drain what is already queued and waits for every delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinHandle, JoinSet};

use company::{PriceListSink, Producer};
use shared::{component_debug, component_info, component_warn, ComponentId, MaterialId, PriceList, ProducerId};

use crate::error::{ProducerError, ProducerResult};
use crate::quote_book::QuoteBook;

struct QuoteRequest {
    material: MaterialId,
    sink: PriceListSink,
}

/// Totals reported by `AsyncProducer::stop`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub requests: usize,
    pub deliveries: usize,
    pub accepted: usize,
}

enum RunState {
    Idle(mpsc::UnboundedReceiver<QuoteRequest>),
    Running(JoinHandle<DeliveryStats>),
    Stopped,
}

/// Delivers quotes after `delay`, optionally several times each
pub struct AsyncProducer {
    id: ProducerId,
    component: ComponentId,
    book: Arc<QuoteBook>,
    delay: Duration,
    repeat: usize,

    requests: AtomicUsize,
    inbox: Mutex<Option<mpsc::UnboundedSender<QuoteRequest>>>,
    state: Mutex<RunState>,
}

impl AsyncProducer {
    pub fn new(name: impl Into<String>, book: QuoteBook) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            id: ProducerId::new(),
            component: ComponentId::Producer(name.into()),
            book: Arc::new(book),
            delay: Duration::ZERO,
            repeat: 1,
            requests: AtomicUsize::new(0),
            inbox: Mutex::new(Some(tx)),
            state: Mutex::new(RunState::Idle(rx)),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Deliver each quote `repeat` times; values below 1 are treated as 1
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat.max(1);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub async fn is_running(&self) -> bool {
        matches!(*self.state.lock().await, RunState::Running(_))
    }

    /// Spawn the dispatcher; requests queued before now are served first
    pub async fn start(&self) -> ProducerResult<()> {
        let mut state = self.state.lock().await;
        let inbox = match std::mem::replace(&mut *state, RunState::Stopped) {
            RunState::Idle(rx) => rx,
            running @ RunState::Running(_) => {
                *state = running;
                return Err(self.error(|name| ProducerError::AlreadyRunning { name }));
            }
            RunState::Stopped => return Err(self.error(|name| ProducerError::AlreadyStopped { name })),
        };

        let dispatcher = Dispatcher {
            id: self.id.clone(),
            component: self.component.clone(),
            book: Arc::clone(&self.book),
            delay: self.delay,
            repeat: self.repeat,
        };
        *state = RunState::Running(tokio::spawn(dispatcher.run(inbox)));

        component_info!(self.component, "🚀 Delivering quotes after {:?}", self.delay);
        Ok(())
    }

    /// Close the inbox and wait for every queued request to be delivered
    pub async fn stop(&self) -> ProducerResult<DeliveryStats> {
        let mut state = self.state.lock().await;
        let handle = match std::mem::replace(&mut *state, RunState::Stopped) {
            RunState::Running(handle) => handle,
            idle @ RunState::Idle(_) => {
                *state = idle;
                return Err(self.error(|name| ProducerError::NotRunning { name }));
            }
            RunState::Stopped => return Err(self.error(|name| ProducerError::NotRunning { name })),
        };

        // dropping the only sender ends the dispatcher once the queue is empty
        self.inbox.lock().await.take();

        let mut stats = handle.await?;
        stats.requests = self.requests();
        component_info!(
            self.component,
            "🛑 Stopped after {} requests, {} deliveries ({} accepted)",
            stats.requests,
            stats.deliveries,
            stats.accepted
        );
        Ok(stats)
    }

    fn error(&self, build: impl FnOnce(String) -> ProducerError) -> ProducerError {
        build(self.component.to_string())
    }
}

#[async_trait::async_trait]
impl Producer for AsyncProducer {
    fn id(&self) -> ProducerId {
        self.id.clone()
    }

    async fn request_price_list(&self, material: MaterialId, sink: PriceListSink) {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let inbox = self.inbox.lock().await;
        let queued = inbox
            .as_ref()
            .map(|tx| tx.send(QuoteRequest { material, sink }).is_ok())
            .unwrap_or(false);

        if !queued {
            component_warn!(self.component, "Request for {} after stop, dropping it", material);
        }
    }
}

struct Dispatcher {
    id: ProducerId,
    component: ComponentId,
    book: Arc<QuoteBook>,
    delay: Duration,
    repeat: usize,
}

impl Dispatcher {
    async fn run(self, mut inbox: mpsc::UnboundedReceiver<QuoteRequest>) -> DeliveryStats {
        let mut deliveries = JoinSet::new();

        while let Some(QuoteRequest { material, sink }) = inbox.recv().await {
            let Some(list) = self.book.get(material).cloned() else {
                component_debug!(self.component, "No quote for {}, staying silent", material);
                continue;
            };
            deliveries.spawn(deliver(
                self.id.clone(),
                self.component.clone(),
                list,
                sink,
                self.delay,
                self.repeat,
            ));
        }

        let mut stats = DeliveryStats::default();
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok((sent, accepted)) => {
                    stats.deliveries += sent;
                    stats.accepted += accepted;
                }
                Err(e) => component_warn!(self.component, "Delivery task failed: {}", e),
            }
        }
        stats
    }
}

/// Returns (deliveries made, deliveries accepted as new contributions)
async fn deliver(
    id: ProducerId,
    component: ComponentId,
    list: PriceList,
    sink: PriceListSink,
    delay: Duration,
    repeat: usize,
) -> (usize, usize) {
    tokio::time::sleep(delay).await;

    let material = list.material;
    let mut accepted = 0;
    for _ in 0..repeat {
        match sink.submit(&id, list.clone()).await {
            Ok(true) => accepted += 1,
            Ok(false) => {}
            Err(e) => component_warn!(component, "⚠️ Quote for {} rejected: {}", material, e),
        }
    }
    component_debug!(component, "💰 Delivered {} x{}", material, repeat);
    (repeat, accepted)
}
