//! Reference producers for the welding company
//!
//! Producers quote per-material price lists back into a company through the
//! sink handed to them with each request. `SyncProducer` answers inline;
//! `AsyncProducer` answers later from a background task.

pub mod async_producer;
pub mod error;
pub mod quote_book;
pub mod sync_producer;

pub use async_producer::{AsyncProducer, DeliveryStats};
pub use error::{ProducerError, ProducerResult};
pub use quote_book::QuoteBook;
pub use sync_producer::SyncProducer;
