//! Per-material price catalog
//!
//! Each material gets a `CatalogEntry` that folds producer quotes into one
//! canonical price list. An entry is ready once every registered producer has
//! contributed exactly once; only then may orders be priced against it.

use std::collections::{HashMap, HashSet};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use shared::validation::validate_price_list;
use shared::{component_debug, component_warn, ComponentId, MaterialId, PriceList, PricedShape, ProducerId};

use crate::error::{CompanyError, CompanyResult};

/// Merged quotes for one material
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    contributors: HashSet<ProducerId>,
    merged: PriceList,
}

impl CatalogEntry {
    pub fn new(material: MaterialId) -> Self {
        Self {
            contributors: HashSet::new(),
            merged: PriceList::new(material),
        }
    }

    /// Fold a producer's quotes into the canonical list
    ///
    /// Returns `false` without touching anything if this producer already
    /// contributed. Costs only ever decrease and shapes are never removed.
    pub fn contribute(&mut self, producer: &ProducerId, quotes: &PriceList) -> bool {
        if !self.contributors.insert(producer.clone()) {
            return false;
        }

        for offered in &quotes.entries {
            self.merge(offered);
        }
        true
    }

    /// Full scan for an equivalent shape; insert only when nothing matched
    fn merge(&mut self, offered: &PricedShape) {
        let existing = self
            .merged
            .entries
            .iter_mut()
            .find(|entry| entry.shape.is_equivalent(&offered.shape));

        match existing {
            Some(entry) => {
                if offered.cost < entry.cost {
                    entry.cost = offered.cost;
                }
            }
            None => self.merged.entries.push(*offered),
        }
    }

    pub fn is_ready(&self, total_producers: usize) -> bool {
        self.contributors.len() == total_producers
    }

    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }

    /// Current merged list; partial unless `is_ready` holds
    pub fn snapshot(&self) -> PriceList {
        self.merged.clone()
    }
}

/// Readiness view of one catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStatus {
    pub material: MaterialId,
    pub contributors: usize,
    pub expected: usize,
    pub ready: bool,
    pub price_list: PriceList,
}

/// All catalog entries plus the roster of producers that count towards readiness
#[derive(Debug, Default)]
pub struct PriceCatalog {
    entries: HashMap<MaterialId, CatalogEntry>,
    roster: Option<HashSet<ProducerId>>,
}

impl PriceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze the set of producers; contributions are accepted only from them
    pub fn set_roster(&mut self, producers: HashSet<ProducerId>) {
        self.roster = Some(producers);
    }

    pub fn expected_producers(&self) -> usize {
        self.roster.as_ref().map_or(0, HashSet::len)
    }

    pub fn entry_or_create(&mut self, material: MaterialId) -> &mut CatalogEntry {
        self.entries
            .entry(material)
            .or_insert_with(|| CatalogEntry::new(material))
    }

    pub fn entry(&self, material: MaterialId) -> Option<&CatalogEntry> {
        self.entries.get(&material)
    }

    /// Route a quote to its material's entry
    pub fn contribute(&mut self, producer: &ProducerId, quotes: &PriceList) -> CompanyResult<bool> {
        let roster = self.roster.as_ref().ok_or(CompanyError::NotStarted)?;
        if !roster.contains(producer) {
            return Err(CompanyError::UnknownProducer {
                producer_id: producer.clone(),
            });
        }
        Ok(self.entry_or_create(quotes.material).contribute(producer, quotes))
    }

    /// Snapshot of the material's list, but only once it is complete
    pub fn ready_snapshot(&mut self, material: MaterialId) -> Option<PriceList> {
        let expected = self.expected_producers();
        let entry = self.entry_or_create(material);
        entry.is_ready(expected).then(|| entry.snapshot())
    }

    pub fn status(&self, material: MaterialId) -> Option<EntryStatus> {
        let expected = self.expected_producers();
        self.entries.get(&material).map(|entry| EntryStatus {
            material,
            contributors: entry.contributor_count(),
            expected,
            ready: entry.is_ready(expected),
            price_list: entry.snapshot(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Catalog monitor: one lock for lookup/contribute/snapshot plus a broadcast
/// condition fired on every accepted submission
#[derive(Debug, Default)]
pub struct SharedCatalog {
    catalog: Mutex<PriceCatalog>,
    changed: Notify,
}

impl SharedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_roster(&self, producers: HashSet<ProducerId>) {
        self.catalog.lock().await.set_roster(producers);
    }

    /// Submit a producer's quotes and wake every waiting pricing worker
    pub async fn submit(&self, producer: &ProducerId, quotes: &PriceList) -> CompanyResult<bool> {
        validate_price_list(quotes)?;

        let accepted = {
            let mut catalog = self.catalog.lock().await;
            catalog.contribute(producer, quotes)?
        };

        if accepted {
            component_debug!(
                ComponentId::Company,
                "📥 {} quoted {} shapes for {}",
                producer,
                quotes.len(),
                quotes.material
            );
            self.changed.notify_waiters();
        } else {
            component_debug!(
                ComponentId::Company,
                "🔁 Ignoring repeated quote from {} for {}",
                producer,
                quotes.material
            );
        }
        Ok(accepted)
    }

    /// Block until the material's entry is complete, then snapshot it
    ///
    /// Every submission wakes every waiter, so the predicate is re-checked on
    /// each wake. The waiter is registered before the check so a submission
    /// landing between check and wait is never missed.
    pub async fn await_ready(
        &self,
        material: MaterialId,
        component: &ComponentId,
        stall_warning_interval: Duration,
        readiness_timeout: Option<Duration>,
    ) -> CompanyResult<PriceList> {
        let deadline = readiness_timeout.map(|timeout| Instant::now() + timeout);
        let mut next_warning = Instant::now() + stall_warning_interval;

        loop {
            let mut changed = pin!(self.changed.notified());
            changed.as_mut().enable();

            if let Some(list) = self.catalog.lock().await.ready_snapshot(material) {
                return Ok(list);
            }

            let wake_at = match deadline {
                Some(deadline) => next_warning.min(deadline),
                None => next_warning,
            };

            if tokio::time::timeout_at(wake_at, changed).await.is_ok() {
                continue;
            }

            let (contributors, expected) = self.progress(material).await;
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(CompanyError::CatalogStalled {
                    material,
                    contributors,
                    expected,
                });
            }

            component_warn!(
                component,
                "⏳ Still waiting on {}: {}/{} producers have quoted",
                material,
                contributors,
                expected
            );
            next_warning = Instant::now() + stall_warning_interval;
        }
    }

    async fn progress(&self, material: MaterialId) -> (usize, usize) {
        let catalog = self.catalog.lock().await;
        let contributors = catalog.entry(material).map_or(0, CatalogEntry::contributor_count);
        (contributors, catalog.expected_producers())
    }

    pub async fn status(&self, material: MaterialId) -> Option<EntryStatus> {
        self.catalog.lock().await.status(material)
    }

    /// Wake all waiters so they re-evaluate their conditions
    pub fn wake_all(&self) {
        self.changed.notify_waiters();
    }
}

/// Cloneable handle producers use to deliver quotes back into the company
#[derive(Debug, Clone)]
pub struct PriceListSink {
    catalog: Arc<SharedCatalog>,
}

impl PriceListSink {
    pub(crate) fn new(catalog: Arc<SharedCatalog>) -> Self {
        Self { catalog }
    }

    /// Deliver `quotes` on behalf of `producer`
    ///
    /// # Returns
    /// `true` for a new contribution, `false` if this producer already
    /// contributed to the material
    pub async fn submit(&self, producer: &ProducerId, quotes: PriceList) -> CompanyResult<bool> {
        self.catalog.submit(producer, &quotes).await
    }
}
