//! Company-specific error types

use shared::{MaterialId, ProducerId, CustomerId, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanyError {
    #[error("Company already started: registration and start are closed")]
    AlreadyStarted,

    #[error("Company has not been started")]
    NotStarted,

    #[error("Company already stopped")]
    AlreadyStopped,

    #[error("Producer registered twice: {producer_id}")]
    DuplicateProducer { producer_id: ProducerId },

    #[error("Customer registered twice: {customer_id}")]
    DuplicateCustomer { customer_id: CustomerId },

    #[error("Price list submitted by unregistered producer: {producer_id}")]
    UnknownProducer { producer_id: ProducerId },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Price list for {material} stalled with {contributors}/{expected} producers")]
    CatalogStalled {
        material: MaterialId,
        contributors: usize,
        expected: usize,
    },

    #[error("Solver failed for {material}: {reason}")]
    SolverFailed { material: MaterialId, reason: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl CompanyError {
    pub fn config(field: impl Into<String>) -> Self {
        CompanyError::ConfigurationError { field: field.into() }
    }

    pub fn solver(material: MaterialId, reason: impl Into<String>) -> Self {
        CompanyError::SolverFailed {
            material,
            reason: reason.into(),
        }
    }
}

pub type CompanyResult<T> = Result<T, CompanyError>;
