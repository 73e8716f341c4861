use crate::errors::SetRsError;
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_rpc_types::TransactionRequest;
use async_trait::async_trait;

pub mod abi;
pub mod bidder;
pub mod cache;
pub mod loader;
pub mod provider;
pub mod reader;

/// Read-only access to contract state at a pinned block.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Executes an `eth_call` against `to` at `block` and returns the raw return data.
    async fn call(&self, to: Address, calldata: Bytes, block: u64) -> Result<Bytes, SetRsError>;

    async fn block_number(&self) -> Result<u64, SetRsError>;

    /// Timestamp (seconds) of `block`.
    async fn block_timestamp(&self, block: u64) -> Result<u64, SetRsError>;
}

/// Sends populated transactions.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash, SetRsError>;
}

/// Caller-supplied overrides for a submitted transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    pub from: Option<Address>,
    pub gas: Option<u64>,
    pub gas_price: Option<u128>,
    pub value: Option<U256>,
}

impl TxOptions {
    pub fn sender(sender: Address) -> Self {
        Self {
            from: Some(sender),
            ..Default::default()
        }
    }

    /// Fills the request's sender, gas and price fields, falling back to `default_gas`.
    pub fn apply(&self, mut request: TransactionRequest, default_gas: u64) -> TransactionRequest {
        request.from = self.from;
        request.gas = Some(self.gas.unwrap_or(default_gas));
        request.gas_price = self.gas_price;
        if self.value.is_some() {
            request.value = self.value;
        }
        request
    }
}
