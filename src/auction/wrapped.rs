use crate::{
    errors::SetRsError,
    math::{
        constants::{ETHER_PLACEHOLDER, EXCHANGE_RATE_SCALE},
        full_math::mul_div,
    },
};
use alloy_primitives::{Address, U256};

/// Where a mapping's exchange rate comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// A constant rate, e.g. WETH to ether.
    Fixed(U256),
    /// The wrapper's `exchangeRateStored()`, re-read at every loaded block.
    Stored,
}

/// Links an interest-bearing wrapper (e.g. a cToken) to its underlying asset.
///
/// `exchange_rate` is the 1e18-scaled amount of underlying per wrapped unit for one
/// calculation. For [`RateSource::Stored`] mappings it only holds for the block it was read
/// at, and the loader replaces it on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedTokenMapping {
    pub wrapped: Address,
    pub underlying: Address,
    pub source: RateSource,
    pub exchange_rate: Option<U256>,
}

impl WrappedTokenMapping {
    /// A stored-rate mapping priced at `exchange_rate`.
    pub fn new(wrapped: Address, underlying: Address, exchange_rate: U256) -> Self {
        Self {
            wrapped,
            underlying,
            source: RateSource::Stored,
            exchange_rate: Some(exchange_rate),
        }
    }

    /// A stored-rate mapping whose rate has not been read yet.
    pub fn unpriced(wrapped: Address, underlying: Address) -> Self {
        Self {
            wrapped,
            underlying,
            source: RateSource::Stored,
            exchange_rate: None,
        }
    }

    pub fn fixed(wrapped: Address, underlying: Address, exchange_rate: U256) -> Self {
        Self {
            wrapped,
            underlying,
            source: RateSource::Fixed(exchange_rate),
            exchange_rate: Some(exchange_rate),
        }
    }

    /// WETH unwrapped one-to-one into native ether.
    pub fn ether(weth: Address) -> Self {
        Self::fixed(weth, ETHER_PLACEHOLDER, EXCHANGE_RATE_SCALE)
    }

    pub fn is_stored(&self) -> bool {
        self.source == RateSource::Stored
    }

    pub fn with_exchange_rate(self, exchange_rate: U256) -> Self {
        Self {
            exchange_rate: Some(exchange_rate),
            ..self
        }
    }

    /// Drops a stored rate so it cannot leak into a later calculation.
    pub fn without_stored_rate(self) -> Self {
        match self.source {
            RateSource::Fixed(_) => self,
            RateSource::Stored => Self {
                exchange_rate: None,
                ..self
            },
        }
    }

    pub fn rate(&self) -> Result<U256, SetRsError> {
        self.exchange_rate
            .ok_or(SetRsError::MissingExchangeRate(self.wrapped))
    }

    pub fn to_underlying(&self, wrapped_amount: U256) -> Result<U256, SetRsError> {
        wrapped_to_underlying(wrapped_amount, self.rate()?)
    }

    pub fn to_wrapped(&self, underlying_amount: U256) -> Result<U256, SetRsError> {
        underlying_to_wrapped(underlying_amount, self.rate()?)
    }
}

/// amount * rate / 1e18
pub fn wrapped_to_underlying(amount: U256, exchange_rate: U256) -> Result<U256, SetRsError> {
    if exchange_rate.is_zero() {
        return Err(SetRsError::InvalidPriceState("exchange rate is zero".into()));
    }
    mul_div(amount, exchange_rate, EXCHANGE_RATE_SCALE).ok_or_else(|| {
        SetRsError::ArithmeticOverflow(format!(
            "converting {amount} wrapped at rate {exchange_rate}"
        ))
    })
}

/// amount * 1e18 / rate
pub fn underlying_to_wrapped(amount: U256, exchange_rate: U256) -> Result<U256, SetRsError> {
    if exchange_rate.is_zero() {
        return Err(SetRsError::InvalidPriceState("exchange rate is zero".into()));
    }
    mul_div(amount, EXCHANGE_RATE_SCALE, exchange_rate).ok_or_else(|| {
        SetRsError::ArithmeticOverflow(format!(
            "converting {amount} underlying at rate {exchange_rate}"
        ))
    })
}
