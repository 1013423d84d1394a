//! Producer that answers inside the request

use std::sync::atomic::{AtomicUsize, Ordering};

use company::{PriceListSink, Producer};
use shared::{component_debug, component_warn, ComponentId, MaterialId, ProducerId};

use crate::quote_book::QuoteBook;

/// Delivers its quote before `request_price_list` returns
pub struct SyncProducer {
    id: ProducerId,
    component: ComponentId,
    book: QuoteBook,
    requests: AtomicUsize,
    accepted: AtomicUsize,
}

impl SyncProducer {
    pub fn new(name: impl Into<String>, book: QuoteBook) -> Self {
        Self {
            id: ProducerId::new(),
            component: ComponentId::Producer(name.into()),
            book,
            requests: AtomicUsize::new(0),
            accepted: AtomicUsize::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    /// Deliveries the company took as new contributions
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Producer for SyncProducer {
    fn id(&self) -> ProducerId {
        self.id.clone()
    }

    async fn request_price_list(&self, material: MaterialId, sink: PriceListSink) {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let Some(list) = self.book.get(material) else {
            component_debug!(self.component, "No quote for {}, staying silent", material);
            return;
        };

        match sink.submit(&self.id, list.clone()).await {
            Ok(true) => {
                self.accepted.fetch_add(1, Ordering::Relaxed);
                component_debug!(self.component, "💰 Quoted {} ({} sheets)", material, list.len());
            }
            Ok(false) => {}
            Err(e) => component_warn!(self.component, "⚠️ Quote for {} rejected: {}", material, e),
        }
    }
}
