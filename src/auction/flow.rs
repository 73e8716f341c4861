use crate::{
    auction::{combined::combine_token_addresses, wrapped::WrappedTokenMapping},
    core::basket::BasketSnapshot,
    errors::SetRsError,
    math::{
        full_math::mul_div_exact,
        price_curve::{AuctionPriceState, PriceRatio, linear_price},
    },
};
use alloy_primitives::{Address, U256};

/// Index-aligned token flows of a single bid.
///
/// `inflow[i]` is what the bidder must supply of `tokens[i]`, `outflow[i]` is what the
/// bidder receives. At most one of the two is non-zero for any index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenFlowResult {
    pub tokens: Vec<Address>,
    pub inflow: Vec<U256>,
    pub outflow: Vec<U256>,
}

/// Signed view of one index of a [`TokenFlowResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFlow {
    Inflow(U256),
    Outflow(U256),
    Neutral,
}

impl TokenFlowResult {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Signed flow at index `i`, `None` past the end.
    pub fn flow_at(&self, i: usize) -> Option<TokenFlow> {
        let (inflow, outflow) = (*self.inflow.get(i)?, *self.outflow.get(i)?);
        Some(match (inflow.is_zero(), outflow.is_zero()) {
            (false, _) => TokenFlow::Inflow(inflow),
            (true, false) => TokenFlow::Outflow(outflow),
            (true, true) => TokenFlow::Neutral,
        })
    }

    /// Flow of the first index holding `token`.
    pub fn flow_of(&self, token: Address) -> Option<TokenFlow> {
        let i = self.tokens.iter().position(|t| *t == token)?;
        self.flow_at(i)
    }

    /// Sum of inflows for `token` across all indices it appears at.
    pub fn total_inflow_of(&self, token: Address) -> Result<U256, SetRsError> {
        self.tokens
            .iter()
            .zip(&self.inflow)
            .filter(|(t, _)| **t == token)
            .try_fold(U256::ZERO, |acc, (_, amount)| acc.checked_add(*amount))
            .ok_or_else(|| SetRsError::ArithmeticOverflow(format!("total inflow of {token}")))
    }

    /// Equal lengths and no index that is both an inflow and an outflow.
    pub fn is_consistent(&self) -> bool {
        self.tokens.len() == self.inflow.len()
            && self.tokens.len() == self.outflow.len()
            && self
                .inflow
                .iter()
                .zip(&self.outflow)
                .all(|(i, o)| i.is_zero() || o.is_zero())
    }

    fn push(&mut self, token: Address, flow: TokenFlow) {
        let (inflow, outflow) = match flow {
            TokenFlow::Inflow(amount) => (amount, U256::ZERO),
            TokenFlow::Outflow(amount) => (U256::ZERO, amount),
            TokenFlow::Neutral => (U256::ZERO, U256::ZERO),
        };
        self.tokens.push(token);
        self.inflow.push(inflow);
        self.outflow.push(outflow);
    }
}

/// Computes the token flows of a rebalancing auction bid.
///
/// Stateless apart from the wrapped-token table, which selects the bidder variant:
/// empty for the plain bidder, cToken-to-underlying entries for the cToken bidder, and
/// [`WrappedTokenMapping::ether`] for the ether bidder.
#[derive(Debug, Clone, Default)]
pub struct AuctionFlowCalculator {
    wrapped: Vec<WrappedTokenMapping>,
}

impl AuctionFlowCalculator {
    pub fn new(wrapped: Vec<WrappedTokenMapping>) -> Self {
        Self { wrapped }
    }

    pub fn bid_price(&self, price_state: &AuctionPriceState) -> Result<PriceRatio, SetRsError> {
        linear_price(price_state)
    }

    pub fn compute(
        &self,
        current: &BasketSnapshot,
        next: &BasketSnapshot,
        bid_quantity: U256,
        price_state: &AuctionPriceState,
    ) -> Result<TokenFlowResult, SetRsError> {
        current.validate()?;
        next.validate()?;
        validate_bid_quantity(current, next, bid_quantity)?;

        let price = linear_price(price_state)?;
        let tokens = combine_token_addresses(current, next);

        tracing::debug!(
            %bid_quantity,
            numerator = %price.numerator,
            denominator = %price.denominator,
            tokens = tokens.len(),
            "computing bid token flows"
        );

        let mut result = TokenFlowResult {
            tokens: Vec::with_capacity(tokens.len()),
            inflow: Vec::with_capacity(tokens.len()),
            outflow: Vec::with_capacity(tokens.len()),
        };

        for token in tokens {
            let current_amount = scale_to_quantity(current, token, bid_quantity)?;
            let next_amount = scale_to_quantity(next, token, bid_quantity)?;

            // Only the current side floats with the auction price.
            let received = price.apply(current_amount)?;
            let flow = net_flow(next_amount, received);

            let (output_token, flow) = self.express_in_underlying(token, flow)?;
            tracing::trace!(?token, ?output_token, ?flow, "bid flow");
            result.push(output_token, flow);
        }

        Ok(result)
    }

    fn express_in_underlying(
        &self,
        token: Address,
        flow: TokenFlow,
    ) -> Result<(Address, TokenFlow), SetRsError> {
        let Some(mapping) = self.wrapped.iter().find(|m| m.wrapped == token) else {
            return Ok((token, flow));
        };
        let flow = match flow {
            TokenFlow::Inflow(amount) => TokenFlow::Inflow(mapping.to_underlying(amount)?),
            TokenFlow::Outflow(amount) => TokenFlow::Outflow(mapping.to_underlying(amount)?),
            TokenFlow::Neutral => {
                mapping.rate()?;
                TokenFlow::Neutral
            }
        };
        Ok((mapping.underlying, flow))
    }
}

/// Nets what the bidder supplies against what it receives for one token.
fn net_flow(supplied: U256, received: U256) -> TokenFlow {
    if supplied > received {
        TokenFlow::Inflow(supplied - received)
    } else if received > supplied {
        TokenFlow::Outflow(received - supplied)
    } else {
        TokenFlow::Neutral
    }
}

/// unit * quantity / naturalUnit, refusing to truncate.
fn scale_to_quantity(
    basket: &BasketSnapshot,
    token: Address,
    quantity: U256,
) -> Result<U256, SetRsError> {
    let unit = basket.unit_of(token)?;
    let (amount, remainder) = mul_div_exact(unit, quantity, basket.natural_unit)
        .ok_or_else(|| SetRsError::ArithmeticOverflow(format!("scaling {token} to bid quantity")))?;
    if !remainder.is_zero() {
        return Err(SetRsError::InvalidBidQuantity {
            quantity,
            reason: format!(
                "{unit} units of {token} do not divide evenly by natural unit {}",
                basket.natural_unit
            ),
        });
    }
    Ok(amount)
}

fn validate_bid_quantity(
    current: &BasketSnapshot,
    next: &BasketSnapshot,
    quantity: U256,
) -> Result<(), SetRsError> {
    if quantity.is_zero() {
        return Err(SetRsError::InvalidBidQuantity {
            quantity,
            reason: "bid quantity must be positive".into(),
        });
    }
    let governing = current.natural_unit.max(next.natural_unit);
    if !(quantity % governing).is_zero() {
        return Err(SetRsError::InvalidBidQuantity {
            quantity,
            reason: format!("not a multiple of natural unit {governing}"),
        });
    }
    Ok(())
}
