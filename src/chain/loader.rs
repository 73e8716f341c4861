use crate::{
    auction::{AuctionFlowCalculator, TokenFlowResult, WrappedTokenMapping},
    chain::{ContractCaller, cache::ContractCache, reader::SetReader},
    core::basket::BasketSnapshot,
    errors::SetRsError,
    math::price_curve::AuctionPriceState,
};
use alloy_primitives::{Address, U256};
use futures::future::try_join_all;
use std::sync::Arc;

/// Everything the flow calculator needs, read at a single block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionSnapshot {
    pub block: u64,
    pub rebalancing_set: Address,
    pub current_set: Address,
    pub next_set: Address,
    pub current: BasketSnapshot,
    pub next: BasketSnapshot,
    pub price_state: AuctionPriceState,
    pub wrapped: Vec<WrappedTokenMapping>,
}

impl AuctionSnapshot {
    pub fn calculator(&self) -> AuctionFlowCalculator {
        AuctionFlowCalculator::new(self.wrapped.clone())
    }

    pub fn token_flows(&self, bid_quantity: U256) -> Result<TokenFlowResult, SetRsError> {
        self.calculator()
            .compute(&self.current, &self.next, bid_quantity, &self.price_state)
    }
}

/// Loads consistent [`AuctionSnapshot`]s, pinning every read to one block.
pub struct AuctionLoader<C: ?Sized> {
    reader: SetReader<C>,
    cache: Arc<ContractCache>,
}

impl<C: ContractCaller + ?Sized> AuctionLoader<C> {
    pub fn new(caller: Arc<C>, cache: Arc<ContractCache>) -> Self {
        Self {
            reader: SetReader::new(caller),
            cache,
        }
    }

    pub fn reader(&self) -> &SetReader<C> {
        &self.reader
    }

    /// Reads the auction state of `rebalancing_set` at `block`, or at the latest block.
    ///
    /// Stored-rate entries of `wrapped` get a fresh `exchangeRateStored()` read at the same
    /// block when their token appears in either basket, replacing any rate they carry.
    pub async fn load(
        &self,
        rebalancing_set: Address,
        wrapped: &[WrappedTokenMapping],
        block: Option<u64>,
    ) -> Result<AuctionSnapshot, SetRsError> {
        let block = match block {
            Some(number) => number,
            None => self.reader.caller().block_number().await?,
        };
        tracing::debug!(?rebalancing_set, block, "loading auction snapshot");

        let (current_set, next_set, auction_library, params, timestamp) = tokio::try_join!(
            self.reader.current_set(rebalancing_set, block),
            self.reader.next_set(rebalancing_set, block),
            self.reader.auction_library(rebalancing_set, block),
            self.reader.price_parameters(rebalancing_set, block),
            self.reader.caller().block_timestamp(block),
        )?;

        let (current, next, price_divisor) = tokio::try_join!(
            self.basket(current_set, block),
            self.basket(next_set, block),
            self.reader.price_divisor(auction_library, block),
        )?;

        let wrapped = try_join_all(
            wrapped
                .iter()
                .map(|mapping| self.price_mapping(*mapping, &current, &next, block)),
        )
        .await?;

        if timestamp < params.start_time {
            tracing::warn!(
                ?rebalancing_set,
                timestamp,
                start_time = params.start_time,
                "block predates auction start; treating elapsed time as zero"
            );
        }

        let price_state = AuctionPriceState {
            start_price: params.start_price,
            pivot_price: params.pivot_price,
            time_to_pivot: params.time_to_pivot,
            price_denominator: price_divisor,
            elapsed_time: timestamp.saturating_sub(params.start_time),
        };

        Ok(AuctionSnapshot {
            block,
            rebalancing_set,
            current_set,
            next_set,
            current,
            next,
            price_state,
            wrapped,
        })
    }

    async fn basket(&self, set: Address, block: u64) -> Result<BasketSnapshot, SetRsError> {
        if let Some(basket) = self.cache.get(set).await {
            tracing::trace!(?set, "[CACHE HIT] basket");
            return Ok(basket);
        }
        tracing::trace!(?set, "[CACHE MISS] reading basket on-chain");
        let basket = self.reader.basket(set, block).await?;
        self.cache.insert(set, basket.clone()).await;
        Ok(basket)
    }

    async fn price_mapping(
        &self,
        mapping: WrappedTokenMapping,
        current: &BasketSnapshot,
        next: &BasketSnapshot,
        block: u64,
    ) -> Result<WrappedTokenMapping, SetRsError> {
        let referenced = current.contains(mapping.wrapped) || next.contains(mapping.wrapped);
        if !mapping.is_stored() {
            return Ok(mapping);
        }
        if !referenced {
            return Ok(mapping.without_stored_rate());
        }
        let rate = self.reader.exchange_rate(mapping.wrapped, block).await?;
        tracing::debug!(wrapped = ?mapping.wrapped, %rate, block, "read exchange rate");
        Ok(mapping.with_exchange_rate(rate))
    }
}
