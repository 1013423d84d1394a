//! Collaborator trait definitions with mockall annotations for testing
//!
//! Producers, customers and the solver are owned outside the company and
//! reached only through these traits. The company holds `Arc` handles and
//! never assumes anything about how they are implemented.

use shared::{CustomerId, MaterialId, Order, PriceList, ProducerId};

use crate::core::PriceListSink;
use crate::error::CompanyResult;

/// Source of price quotes for materials
///
/// A request is fire-and-forget from the company's side: the producer answers
/// later (or immediately) by submitting through the provided sink, from any
/// task or thread. Answering more than once for the same material is harmless.
#[mockall::automock]
#[async_trait::async_trait]
pub trait Producer: Send + Sync {
    /// Stable identity used to deduplicate contributions
    fn id(&self) -> ProducerId;

    /// Ask for the producer's price list for `material`
    ///
    /// # Parameters
    /// - `material`: Material the company needs quotes for
    /// - `sink`: Handle for delivering the quote back into the company
    async fn request_price_list(&self, material: MaterialId, sink: PriceListSink);
}

/// Origin of orders and receiver of priced results
#[mockall::automock]
#[async_trait::async_trait]
pub trait Customer: Send + Sync {
    fn id(&self) -> CustomerId;

    /// Wait for the next order
    ///
    /// # Returns
    /// The next order, or `None` once this customer has no more demand
    async fn next_demand(&self) -> Option<Order>;

    /// Receive an order back with costs attached; called exactly once per order
    async fn on_completed(&self, order: Order);
}

/// Batch pricing algorithm
///
/// Mutates the orders in place, attaching a cost to each item. Runs on the
/// blocking thread pool, so implementations may be CPU heavy.
#[mockall::automock]
pub trait Solver: Send + Sync {
    fn solve(&self, orders: &mut [Order], price_list: &PriceList) -> CompanyResult<()>;
}
