//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Unique identifier for price producers
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProducerId(Uuid);

impl ProducerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> SharedResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }
}

impl Default for ProducerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProducerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for customers issuing demand
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(Uuid);

impl CustomerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> SharedResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| SharedError::InvalidUuid { input: s.to_string() })
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Material under which producers quote and customers order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material_{}", self.0)
    }
}

/// Physical sheet dimensions. `(w, h)` and `(h, w)` describe the same sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    pub width: u32,
    pub height: u32,
}

impl Shape {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The same sheet turned by 90 degrees
    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Orientation-independent key (smaller side first)
    pub fn canonical(&self) -> Self {
        if self.width <= self.height {
            *self
        } else {
            self.rotated()
        }
    }

    /// Exact or 90-degree rotated match
    pub fn is_equivalent(&self, other: &Shape) -> bool {
        self == other || self.rotated() == *other
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A quoted sheet and its cost
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricedShape {
    pub shape: Shape,
    pub cost: f64,
}

/// Price quotes for one material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceList {
    pub material: MaterialId,
    pub entries: Vec<PricedShape>,
}

impl PriceList {
    pub fn new(material: MaterialId) -> Self {
        Self {
            material,
            entries: Vec::new(),
        }
    }

    /// Builder-style entry insertion
    pub fn with_entry(mut self, width: u32, height: u32, cost: f64) -> Self {
        self.add(Shape::new(width, height), cost);
        self
    }

    /// Append an entry as-is; no deduplication happens here
    pub fn add(&mut self, shape: Shape, cost: f64) {
        self.entries.push(PricedShape { shape, cost });
    }

    /// Lowest quoted cost for the shape or its rotation
    pub fn cost_of(&self, shape: &Shape) -> Option<f64> {
        self.entries
            .iter()
            .filter(|entry| entry.shape.is_equivalent(shape))
            .map(|entry| entry.cost)
            .reduce(f64::min)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One sheet a customer needs, priced in place by the solver
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub shape: Shape,
    /// Cost per unit length of a welded seam
    pub welding_strength: f64,
    pub cost: Option<f64>,
}

impl OrderItem {
    pub fn new(width: u32, height: u32, welding_strength: f64) -> Self {
        Self {
            shape: Shape::new(width, height),
            welding_strength,
            cost: None,
        }
    }
}

/// A customer's request for prices on a list of sheets of one material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub material: MaterialId,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(material: MaterialId) -> Self {
        Self {
            id: OrderId::new(),
            material,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, width: u32, height: u32, welding_strength: f64) -> Self {
        self.items.push(OrderItem::new(width, height, welding_strength));
        self
    }

    /// True once every item carries a cost
    pub fn is_priced(&self) -> bool {
        self.items.iter().all(|item| item.cost.is_some())
    }

    /// Sum of item costs, `None` while any item is unpriced
    pub fn total_cost(&self) -> Option<f64> {
        self.items.iter().map(|item| item.cost).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rotation_equivalence() {
        let a = Shape::new(3, 4);
        let b = Shape::new(4, 3);

        assert!(a.is_equivalent(&b));
        assert!(b.is_equivalent(&a));
        assert_eq!(a.canonical(), b.canonical());
        assert!(!a.is_equivalent(&Shape::new(3, 5)));
    }

    #[test]
    fn test_price_list_cost_lookup_is_rotation_aware() {
        let list = PriceList::new(MaterialId(1))
            .with_entry(3, 4, 10.0)
            .with_entry(4, 3, 8.0)
            .with_entry(2, 2, 1.0);

        assert_eq!(list.cost_of(&Shape::new(3, 4)), Some(8.0));
        assert_eq!(list.cost_of(&Shape::new(2, 2)), Some(1.0));
        assert_eq!(list.cost_of(&Shape::new(9, 9)), None);
    }

    #[test]
    fn test_order_total_cost() {
        let mut order = Order::new(MaterialId(7))
            .with_item(2, 2, 1.0)
            .with_item(3, 1, 0.5);

        assert!(!order.is_priced());
        assert_eq!(order.total_cost(), None);

        order.items[0].cost = Some(4.0);
        order.items[1].cost = Some(1.5);

        assert!(order.is_priced());
        assert_eq!(order.total_cost(), Some(5.5));
    }

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(ProducerId::new(), ProducerId::new());
        assert_ne!(CustomerId::new(), CustomerId::new());
        assert_eq!(MaterialId(3).to_string(), "material_3");
    }

    #[test]
    fn test_id_parsing() {
        let parsed = ProducerId::from_string("550e8400-e29b-41d4-a716-446655440001").unwrap();
        assert_eq!(parsed.to_string(), "550e8400-e29b-41d4-a716-446655440001");
        assert!(matches!(
            CustomerId::from_string("not-a-uuid"),
            Err(SharedError::InvalidUuid { .. })
        ));
    }
}
