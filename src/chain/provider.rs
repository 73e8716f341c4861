use crate::{
    chain::{ContractCaller, TransactionSubmitter},
    errors::SetRsError,
};
use alloy_primitives::{Address, Bytes, TxHash, TxKind};
use alloy_provider::Provider;
use alloy_rpc_types::{BlockId, BlockNumberOrTag, TransactionRequest};
use async_trait::async_trait;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

/// [`ContractCaller`] backed by an alloy provider.
pub struct ProviderCaller<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: Provider + Send + Sync + 'static + ?Sized> ProviderCaller<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P: ?Sized> Debug for ProviderCaller<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProviderCaller").finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: Provider + Send + Sync + 'static + ?Sized> ContractCaller for ProviderCaller<P> {
    async fn call(&self, to: Address, calldata: Bytes, block: u64) -> Result<Bytes, SetRsError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: Some(calldata).into(),
            ..Default::default()
        };
        self.provider
            .call(request)
            .block(BlockId::number(block))
            .await
            .map_err(|e| SetRsError::ProviderError(e.to_string()))
    }

    async fn block_number(&self) -> Result<u64, SetRsError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| SetRsError::ProviderError(e.to_string()))
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, SetRsError> {
        let header = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block))
            .await
            .map_err(|e| SetRsError::ProviderError(e.to_string()))?
            .ok_or_else(|| SetRsError::ProviderError(format!("block {block} not found")))?
            .header;
        Ok(header.timestamp)
    }
}

/// [`TransactionSubmitter`] that hands transactions to an alloy provider for signing and broadcast.
pub struct ProviderSubmitter<P: ?Sized> {
    provider: Arc<P>,
}

impl<P: Provider + Send + Sync + 'static + ?Sized> ProviderSubmitter<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

impl<P: ?Sized> Debug for ProviderSubmitter<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ProviderSubmitter").finish_non_exhaustive()
    }
}

#[async_trait]
impl<P: Provider + Send + Sync + 'static + ?Sized> TransactionSubmitter for ProviderSubmitter<P> {
    async fn submit(&self, tx: TransactionRequest) -> Result<TxHash, SetRsError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| SetRsError::ProviderError(e.to_string()))?;
        let hash = *pending.tx_hash();
        tracing::info!(?hash, "transaction submitted");
        Ok(hash)
    }
}
