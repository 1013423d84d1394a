//! Test fixtures and data for company tests
//!
//! This module provides consistent test data used across all test suites.

use shared::{MaterialId, Order, PriceList, ProducerId};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const MATERIAL_A: MaterialId = MaterialId(1);
    pub const MATERIAL_B: MaterialId = MaterialId(2);
    pub const MATERIAL_C: MaterialId = MaterialId(3);

    /// Standard test producer IDs using proper UUID format
    pub const PRODUCER_1: &'static str = "550e8400-e29b-41d4-a716-446655440001";
    pub const PRODUCER_2: &'static str = "550e8400-e29b-41d4-a716-446655440002";

    pub fn producer_id_1() -> ProducerId {
        ProducerId::from_string(Self::PRODUCER_1).unwrap()
    }

    pub fn producer_id_2() -> ProducerId {
        ProducerId::from_string(Self::PRODUCER_2).unwrap()
    }

    /// One material quoted twice, once per orientation
    pub fn rotated_pair(material: MaterialId) -> PriceList {
        PriceList::new(material).with_entry(3, 4, 10.0).with_entry(4, 3, 8.0)
    }

    /// Basic sheet set every test producer quotes
    pub fn standard_quotes(material: MaterialId, scale: f64) -> PriceList {
        PriceList::new(material)
            .with_entry(1, 1, 1.0 * scale)
            .with_entry(2, 1, 1.8 * scale)
            .with_entry(2, 2, 3.0 * scale)
            .with_entry(4, 3, 9.0 * scale)
    }

    /// Small order that is always assemblable from `standard_quotes`
    pub fn small_order(material: MaterialId) -> Order {
        Order::new(material).with_item(2, 2, 0.5).with_item(3, 4, 0.25)
    }

    pub fn small_orders(material: MaterialId, count: usize) -> Vec<Order> {
        (0..count).map(|_| Self::small_order(material)).collect()
    }
}
