use crate::{
    auction::{TokenFlowResult, WrappedTokenMapping},
    chain::{
        ContractCaller, TransactionSubmitter, TxOptions,
        abi::IRebalancingSetBidder,
        cache::ContractCache,
        loader::{AuctionLoader, AuctionSnapshot},
    },
    config::SdkConfig,
    errors::SetRsError,
    math::constants::ETHER_PLACEHOLDER,
};
use alloy_primitives::{Address, Bytes, TxHash, TxKind, U256};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use futures::future::try_join_all;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidderKind {
    /// Bids in the baskets' own component tokens.
    Standard,
    /// Flows for cToken components are settled in their underlying asset.
    CToken,
    /// WETH flows are settled in native ether.
    Ether,
}

/// Client for one of the rebalancing auction bidder contracts.
pub struct Bidder<C: ?Sized, S: ?Sized> {
    kind: BidderKind,
    address: Address,
    wrapped: Vec<WrappedTokenMapping>,
    loader: AuctionLoader<C>,
    submitter: Arc<S>,
    default_gas_limit: u64,
}

impl<C: ?Sized, S: ?Sized> Debug for Bidder<C, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Bidder")
            .field("kind", &self.kind)
            .field("address", &self.address)
            .field("wrapped", &self.wrapped)
            .finish_non_exhaustive()
    }
}

impl<C, S> Bidder<C, S>
where
    C: ContractCaller + ?Sized,
    S: TransactionSubmitter + ?Sized,
{
    pub fn new(
        kind: BidderKind,
        address: Address,
        wrapped: Vec<WrappedTokenMapping>,
        caller: Arc<C>,
        submitter: Arc<S>,
        cache: Arc<ContractCache>,
        default_gas_limit: u64,
    ) -> Self {
        Self {
            kind,
            address,
            wrapped,
            loader: AuctionLoader::new(caller, cache),
            submitter,
            default_gas_limit,
        }
    }

    /// Builds the bidder variant described by `config`.
    pub fn from_config(
        kind: BidderKind,
        config: &SdkConfig,
        caller: Arc<C>,
        submitter: Arc<S>,
        cache: Arc<ContractCache>,
    ) -> Self {
        let (address, wrapped) = match kind {
            BidderKind::Standard => (config.bidders.standard, Vec::new()),
            BidderKind::CToken => (
                config.bidders.ctoken,
                config
                    .ctoken_underlyings
                    .iter()
                    .map(|m| WrappedTokenMapping::unpriced(m.ctoken, m.underlying))
                    .collect(),
            ),
            BidderKind::Ether => (
                config.bidders.ether,
                vec![WrappedTokenMapping::ether(config.weth)],
            ),
        };
        let gas = config.default_gas_limit;
        Self::new(kind, address, wrapped, caller, submitter, cache, gas)
    }

    pub fn kind(&self) -> BidderKind {
        self.kind
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Checks every stored-rate mapping against the wrapper's on-chain `underlying()`.
    pub async fn verify_underlyings(&self, block: Option<u64>) -> Result<(), SetRsError> {
        let reader = self.loader.reader();
        let block = match block {
            Some(number) => number,
            None => reader.caller().block_number().await?,
        };
        let stored = self.wrapped.iter().filter(|m| m.is_stored());
        let onchain =
            try_join_all(stored.clone().map(|m| reader.underlying(m.wrapped, block))).await?;

        for (mapping, underlying) in stored.zip(onchain) {
            if underlying != mapping.underlying {
                return Err(SetRsError::ConfigError(format!(
                    "{} wraps {underlying} on-chain, configured as {}",
                    mapping.wrapped, mapping.underlying
                )));
            }
            tracing::debug!(wrapped = ?mapping.wrapped, ?underlying, "underlying verified");
        }
        Ok(())
    }

    pub async fn snapshot(
        &self,
        rebalancing_set: Address,
        block: Option<u64>,
    ) -> Result<AuctionSnapshot, SetRsError> {
        self.loader.load(rebalancing_set, &self.wrapped, block).await
    }

    /// Token flows of bidding `quantity` at the latest block.
    pub async fn token_flows(
        &self,
        rebalancing_set: Address,
        quantity: U256,
    ) -> Result<TokenFlowResult, SetRsError> {
        self.token_flows_at(rebalancing_set, quantity, None).await
    }

    pub async fn token_flows_at(
        &self,
        rebalancing_set: Address,
        quantity: U256,
        block: Option<u64>,
    ) -> Result<TokenFlowResult, SetRsError> {
        self.snapshot(rebalancing_set, block)
            .await?
            .token_flows(quantity)
    }

    /// Validates the bid off-chain, then submits `bidAndWithdraw` (or its ether variant).
    ///
    /// For the ether bidder the attached value defaults to the ether inflow of the bid.
    pub async fn bid(
        &self,
        rebalancing_set: Address,
        quantity: U256,
        allow_partial_fill: bool,
        options: TxOptions,
    ) -> Result<TxHash, SetRsError> {
        let flows = self.token_flows(rebalancing_set, quantity).await?;
        let request = self.bid_request(rebalancing_set, quantity, allow_partial_fill, &flows)?;
        let request = options.apply(request, self.default_gas_limit);

        tracing::info!(
            kind = ?self.kind,
            ?rebalancing_set,
            %quantity,
            allow_partial_fill,
            "submitting bid"
        );
        self.submitter.submit(request).await
    }

    fn bid_request(
        &self,
        rebalancing_set: Address,
        quantity: U256,
        allow_partial_fill: bool,
        flows: &TokenFlowResult,
    ) -> Result<TransactionRequest, SetRsError> {
        let (calldata, value) = match self.kind {
            BidderKind::Standard | BidderKind::CToken => (
                IRebalancingSetBidder::bidAndWithdrawCall {
                    rebalancingSetToken: rebalancing_set,
                    quantity,
                    allowPartialFill: allow_partial_fill,
                }
                .abi_encode(),
                None,
            ),
            BidderKind::Ether => (
                IRebalancingSetBidder::bidAndWithdrawWithEtherCall {
                    rebalancingSetToken: rebalancing_set,
                    quantity,
                    allowPartialFill: allow_partial_fill,
                }
                .abi_encode(),
                Some(flows.total_inflow_of(ETHER_PLACEHOLDER)?),
            ),
        };
        Ok(TransactionRequest {
            to: Some(TxKind::Call(self.address)),
            input: Some(Bytes::from(calldata)).into(),
            value,
            ..Default::default()
        })
    }
}
