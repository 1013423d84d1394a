//! Producer error types

use thiserror::Error;

/// Result type for producer operations
pub type ProducerResult<T> = Result<T, ProducerError>;

#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("Producer {name} is already running")]
    AlreadyRunning { name: String },

    #[error("Producer {name} is not running")]
    NotRunning { name: String },

    #[error("Producer {name} was stopped and cannot be restarted")]
    AlreadyStopped { name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}
