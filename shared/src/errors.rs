//! Shared error types for the welding company system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid UUID: {input}")]
    InvalidUuid { input: String },

    #[error("Invalid welding strength for {shape}: {value}")]
    InvalidWeldingStrength { shape: String, value: f64 },

    #[error("Invalid shape: {width}x{height}")]
    InvalidShape { width: u32, height: u32 },

    #[error("Invalid cost for {shape}: {cost}")]
    InvalidCost { shape: String, cost: f64 },
}

pub type SharedResult<T> = Result<T, SharedError>;
