use crate::{errors::SetRsError, math::full_math::mul_div};
use alloy_primitives::U256;

/// Parameters of a rebalancing auction's linear price curve, as read at one block.
///
/// Times are whole seconds, the resolution of block timestamps and of
/// `auctionTimeToPivot` on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionPriceState {
    pub start_price: U256,
    pub pivot_price: U256,
    pub time_to_pivot: u64,
    pub price_denominator: U256,
    pub elapsed_time: u64,
}

/// Price at which current-basket units convert to next-basket units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRatio {
    pub numerator: U256,
    pub denominator: U256,
}

impl PriceRatio {
    /// floor(amount * numerator / denominator)
    pub fn apply(&self, amount: U256) -> Result<U256, SetRsError> {
        if self.denominator.is_zero() {
            return Err(SetRsError::InvalidPriceState("price denominator is zero".into()));
        }
        mul_div(amount, self.numerator, self.denominator).ok_or_else(|| {
            SetRsError::ArithmeticOverflow(format!(
                "{amount} * {} / {} exceeds 256 bits",
                self.numerator, self.denominator
            ))
        })
    }
}

/// Computes the current bid price on the linear curve.
///
/// Between `0` and `time_to_pivot` the numerator moves linearly from `start_price` to
/// `pivot_price`. Past the pivot it keeps the same slope with no ceiling, so an ascending
/// curve keeps rising until the auction is filled or fails. A descending curve that would
/// cross zero is rejected. Time is counted in whole seconds, matching block timestamps.
pub fn linear_price(state: &AuctionPriceState) -> Result<PriceRatio, SetRsError> {
    if state.price_denominator.is_zero() {
        return Err(SetRsError::InvalidPriceState("price denominator is zero".into()));
    }

    let time_to_pivot = U256::from(state.time_to_pivot);
    let elapsed = U256::from(state.elapsed_time);

    let numerator = if time_to_pivot.is_zero() {
        state.pivot_price
    } else if state.pivot_price >= state.start_price {
        let step = price_step(state.pivot_price - state.start_price, elapsed, time_to_pivot)?;
        state
            .start_price
            .checked_add(step)
            .ok_or_else(|| SetRsError::ArithmeticOverflow("price numerator".into()))?
    } else {
        let step = price_step(state.start_price - state.pivot_price, elapsed, time_to_pivot)?;
        state.start_price.checked_sub(step).ok_or_else(|| {
            SetRsError::InvalidPriceState(format!(
                "descending curve drops below zero after {}s",
                state.elapsed_time
            ))
        })?
    };

    tracing::trace!(%numerator, denominator = %state.price_denominator, "linear auction price");

    Ok(PriceRatio {
        numerator,
        denominator: state.price_denominator,
    })
}

/// delta * elapsed / time_to_pivot, multiplied before dividing to keep precision.
fn price_step(delta: U256, elapsed: U256, time_to_pivot: U256) -> Result<U256, SetRsError> {
    mul_div(delta, elapsed, time_to_pivot)
        .ok_or_else(|| SetRsError::ArithmeticOverflow("price curve step".into()))
}
