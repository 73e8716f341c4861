use crate::{
    chain::{
        ContractCaller,
        abi::{IAuctionPriceCurve, ICToken, IRebalancingSetToken, ISetToken},
    },
    core::basket::BasketSnapshot,
    errors::SetRsError,
};
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use std::sync::Arc;

/// Raw `getAuctionPriceParameters()` values of a rebalancing Set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionPriceParameters {
    pub start_time: u64,
    pub time_to_pivot: u64,
    pub start_price: U256,
    pub pivot_price: U256,
}

impl AuctionPriceParameters {
    pub fn from_words(words: &[U256]) -> Result<Self, SetRsError> {
        let [start_time, time_to_pivot, start_price, pivot_price, ..] = words else {
            return Err(SetRsError::AbiDecodeError(format!(
                "expected 4 auction price parameters, got {}",
                words.len()
            )));
        };
        Ok(Self {
            start_time: to_seconds(*start_time, "auctionStartTime")?,
            time_to_pivot: to_seconds(*time_to_pivot, "auctionTimeToPivot")?,
            start_price: *start_price,
            pivot_price: *pivot_price,
        })
    }
}

fn to_seconds(value: U256, field: &str) -> Result<u64, SetRsError> {
    if value > U256::from(u64::MAX) {
        return Err(SetRsError::AbiDecodeError(format!("{field} does not fit in u64: {value}")));
    }
    Ok(value.to::<u64>())
}

/// Typed reads of Set protocol contracts through a [`ContractCaller`].
pub struct SetReader<C: ?Sized> {
    caller: Arc<C>,
}

impl<C: ?Sized> Clone for SetReader<C> {
    fn clone(&self) -> Self {
        Self {
            caller: self.caller.clone(),
        }
    }
}

impl<C: ContractCaller + ?Sized> SetReader<C> {
    pub fn new(caller: Arc<C>) -> Self {
        Self { caller }
    }

    pub fn caller(&self) -> &Arc<C> {
        &self.caller
    }

    async fn read<T: SolCall>(
        &self,
        to: Address,
        call: T,
        block: u64,
    ) -> Result<T::Return, SetRsError> {
        let result_bytes = self
            .caller
            .call(to, Bytes::from(call.abi_encode()), block)
            .await?;
        T::abi_decode_returns(&result_bytes)
            .map_err(|e| SetRsError::AbiDecodeError(format!("{} on {to}: {e}", T::SIGNATURE)))
    }

    /// Components, units and natural unit of a Set token, read concurrently at `block`.
    pub async fn basket(&self, set: Address, block: u64) -> Result<BasketSnapshot, SetRsError> {
        let (components, units, natural_unit) = tokio::try_join!(
            self.read(set, ISetToken::getComponentsCall {}, block),
            self.read(set, ISetToken::getUnitsCall {}, block),
            self.read(set, ISetToken::naturalUnitCall {}, block),
        )?;
        BasketSnapshot::from_parts(components, units, natural_unit)
    }

    pub async fn current_set(
        &self,
        rebalancing_set: Address,
        block: u64,
    ) -> Result<Address, SetRsError> {
        self.read(rebalancing_set, IRebalancingSetToken::currentSetCall {}, block)
            .await
    }

    pub async fn next_set(
        &self,
        rebalancing_set: Address,
        block: u64,
    ) -> Result<Address, SetRsError> {
        self.read(rebalancing_set, IRebalancingSetToken::nextSetCall {}, block)
            .await
    }

    pub async fn auction_library(
        &self,
        rebalancing_set: Address,
        block: u64,
    ) -> Result<Address, SetRsError> {
        self.read(rebalancing_set, IRebalancingSetToken::auctionLibraryCall {}, block)
            .await
    }

    pub async fn price_parameters(
        &self,
        rebalancing_set: Address,
        block: u64,
    ) -> Result<AuctionPriceParameters, SetRsError> {
        let words = self
            .read(rebalancing_set, IRebalancingSetToken::getAuctionPriceParametersCall {}, block)
            .await?;
        AuctionPriceParameters::from_words(&words)
    }

    pub async fn price_divisor(
        &self,
        price_curve: Address,
        block: u64,
    ) -> Result<U256, SetRsError> {
        self.read(price_curve, IAuctionPriceCurve::priceDivisorCall {}, block)
            .await
    }

    pub async fn exchange_rate(&self, ctoken: Address, block: u64) -> Result<U256, SetRsError> {
        self.read(ctoken, ICToken::exchangeRateStoredCall {}, block)
            .await
    }

    pub async fn underlying(&self, ctoken: Address, block: u64) -> Result<Address, SetRsError> {
        self.read(ctoken, ICToken::underlyingCall {}, block).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_parameters_from_words() {
        let words = [U256::from(1_000), U256::from(3_600), U256::from(500), U256::from(1_500)];
        let params = AuctionPriceParameters::from_words(&words).unwrap();
        assert_eq!(params.start_time, 1_000);
        assert_eq!(params.time_to_pivot, 3_600);
        assert_eq!(params.start_price, U256::from(500));
        assert_eq!(params.pivot_price, U256::from(1_500));
    }

    #[test]
    fn price_parameters_too_short() {
        let words = [U256::from(1), U256::from(2)];
        assert!(matches!(
            AuctionPriceParameters::from_words(&words),
            Err(SetRsError::AbiDecodeError(_))
        ));
    }

    #[test]
    fn price_parameters_reject_huge_times() {
        let words = [U256::MAX, U256::from(2), U256::from(3), U256::from(4)];
        assert!(AuctionPriceParameters::from_words(&words).is_err());
    }
}
