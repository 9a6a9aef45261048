//! Error types for the Black-Scholes pricer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown option type: {0:?} (expected call or put)")]
    UnknownOptionType(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type BsResult<T> = Result<T, BsError>;

impl BsError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors raised by the pricing guard
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter(_))
    }
}
