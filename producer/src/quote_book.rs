//! Per-material price lists a producer is able to quote

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use shared::{MaterialId, PriceList};

use crate::error::{ProducerError, ProducerResult};

/// Largest side generated for random quotes
const MAX_RANDOM_SIDE: u32 = 6;

/// The quotes a producer answers with, keyed by material
///
/// Materials missing from the book are never answered.
#[derive(Debug, Clone, Default)]
pub struct QuoteBook {
    lists: HashMap<MaterialId, PriceList>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `insert`
    pub fn with_list(mut self, list: PriceList) -> Self {
        self.insert(list);
        self
    }

    /// Add or replace the list for `list.material`
    pub fn insert(&mut self, list: PriceList) {
        self.lists.insert(list.material, list);
    }

    /// Generate a reproducible book
    ///
    /// Every list carries a 1x1 base sheet so any order is assemblable, plus
    /// `shapes_per_material` larger sheets priced below their area at the
    /// base rate.
    pub fn random(seed: u64, materials: &[MaterialId], shapes_per_material: usize) -> ProducerResult<Self> {
        if shapes_per_material == 0 {
            return Err(ProducerError::ConfigError {
                message: "shapes_per_material must be at least 1".to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut book = Self::new();

        for material in materials {
            let base_rate: f64 = rng.gen_range(1.0..4.0);
            let mut list = PriceList::new(*material).with_entry(1, 1, base_rate);

            for _ in 0..shapes_per_material {
                let width = rng.gen_range(1..=MAX_RANDOM_SIDE);
                let height = rng.gen_range(1..=MAX_RANDOM_SIDE);
                let discount: f64 = rng.gen_range(0.6..1.0);
                let cost = (width * height) as f64 * base_rate * discount;
                list = list.with_entry(width, height, cost);
            }
            book.insert(list);
        }

        Ok(book)
    }

    pub fn get(&self, material: MaterialId) -> Option<&PriceList> {
        self.lists.get(&material)
    }

    pub fn quotes(&self, material: MaterialId) -> bool {
        self.lists.contains_key(&material)
    }

    pub fn materials(&self) -> Vec<MaterialId> {
        let mut materials: Vec<_> = self.lists.keys().copied().collect();
        materials.sort();
        materials
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
