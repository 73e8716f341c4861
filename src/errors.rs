use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetRsError {
    #[error("Invalid basket: {0}")]
    InvalidBasket(String),

    #[error("Invalid bid quantity {quantity}: {reason}")]
    InvalidBidQuantity { quantity: U256, reason: String },

    #[error("Missing exchange rate for wrapped token {0}")]
    MissingExchangeRate(Address),

    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    #[error("Invalid auction price state: {0}")]
    InvalidPriceState(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("ABI decoding error for contract call: {0}")]
    AbiDecodeError(String),

    #[error("Could not fetch required data for address: {0}")]
    DataFetchError(Address),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<alloy_sol_types::Error> for SetRsError {
    fn from(e: alloy_sol_types::Error) -> Self {
        SetRsError::AbiDecodeError(e.to_string())
    }
}
