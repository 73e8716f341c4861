use alloy_primitives::{Address, U256, address};
use setrs::{
    AuctionFlowCalculator, AuctionPriceState, BasketSnapshot, Component, SetRsError, TokenFlow,
    WrappedTokenMapping, math::constants::EXCHANGE_RATE_SCALE,
};

const TOKEN_A: Address = address!("00000000000000000000000000000000000000a1");
const TOKEN_B: Address = address!("00000000000000000000000000000000000000b2");
const TOKEN_C: Address = address!("00000000000000000000000000000000000000c3");
const CTOKEN: Address = address!("5d3a536E4D6DbD6114cc1Ead35777bAB948E3643");
const UNDERLYING: Address = address!("6B175474E89094C44Da98b954EedeAC495271d0F");

fn basket(components: &[(Address, u64)], natural_unit: u64) -> BasketSnapshot {
    BasketSnapshot::new(
        components
            .iter()
            .map(|(address, unit)| Component::new(*address, U256::from(*unit)))
            .collect(),
        U256::from(natural_unit),
    )
}

/// A flat curve at `numerator / 1000`.
fn flat_price(numerator: u64) -> AuctionPriceState {
    AuctionPriceState {
        start_price: U256::from(numerator),
        pivot_price: U256::from(numerator),
        time_to_pivot: 3600,
        price_denominator: U256::from(1000),
        elapsed_time: 0,
    }
}

fn amounts(values: &[u64]) -> Vec<U256> {
    values.iter().map(|v| U256::from(*v)).collect()
}

#[test]
fn test_simple_swap_of_components() {
    let current = basket(&[(TOKEN_A, 100)], 10);
    let next = basket(&[(TOKEN_B, 50)], 10);

    let result = AuctionFlowCalculator::default()
        .compute(&current, &next, U256::from(10), &flat_price(500))
        .unwrap();

    assert_eq!(result.tokens, vec![TOKEN_A, TOKEN_B]);
    assert_eq!(result.outflow, amounts(&[50, 0]));
    assert_eq!(result.inflow, amounts(&[0, 50]));
}

#[test]
fn test_shared_component_nets_to_one_side() {
    let current = basket(&[(TOKEN_A, 100), (TOKEN_B, 40)], 10);
    let next = basket(&[(TOKEN_B, 60), (TOKEN_C, 10)], 10);
    let calculator = AuctionFlowCalculator::default();

    // B: receives 80 * 0.5 = 40, supplies 120 -> pays 80
    let cheap = calculator
        .compute(&current, &next, U256::from(20), &flat_price(500))
        .unwrap();
    assert_eq!(cheap.tokens, vec![TOKEN_A, TOKEN_B, TOKEN_C]);
    assert_eq!(cheap.outflow, amounts(&[100, 0, 0]));
    assert_eq!(cheap.inflow, amounts(&[0, 80, 20]));

    // B: receives 80 * 2 = 160, supplies 120 -> receives 40
    let expensive = calculator
        .compute(&current, &next, U256::from(20), &flat_price(2000))
        .unwrap();
    assert_eq!(expensive.outflow, amounts(&[400, 40, 0]));
    assert_eq!(expensive.inflow, amounts(&[0, 0, 20]));
}

#[test]
fn test_exact_net_is_neutral() {
    let current = basket(&[(TOKEN_A, 10)], 1);
    let next = basket(&[(TOKEN_A, 10)], 1);
    let result = AuctionFlowCalculator::default()
        .compute(&current, &next, U256::from(5), &flat_price(1000))
        .unwrap();
    assert_eq!(result.flow_of(TOKEN_A), Some(TokenFlow::Neutral));
    assert!(result.is_consistent());
}

#[test]
fn test_wrapped_outflow_is_reported_in_underlying() {
    let current = basket(&[(CTOKEN, 100)], 10);
    let next = basket(&[(TOKEN_B, 50)], 10);
    let calculator = AuctionFlowCalculator::new(vec![WrappedTokenMapping::new(
        CTOKEN,
        UNDERLYING,
        EXCHANGE_RATE_SCALE * U256::from(2),
    )]);

    let result = calculator
        .compute(&current, &next, U256::from(10), &flat_price(1000))
        .unwrap();

    assert_eq!(result.tokens, vec![UNDERLYING, TOKEN_B]);
    assert_eq!(result.outflow, amounts(&[200, 0]));
    assert_eq!(result.inflow, amounts(&[0, 50]));
}

#[test]
fn test_wrapped_inflow_is_reported_in_underlying() {
    let current = basket(&[(TOKEN_A, 10)], 10);
    let next = basket(&[(CTOKEN, 30)], 10);
    let calculator = AuctionFlowCalculator::new(vec![WrappedTokenMapping::new(
        CTOKEN,
        UNDERLYING,
        EXCHANGE_RATE_SCALE * U256::from(3),
    )]);
    let result = calculator
        .compute(&current, &next, U256::from(10), &flat_price(1000))
        .unwrap();
    assert_eq!(result.tokens, vec![TOKEN_A, UNDERLYING]);
    assert_eq!(result.flow_of(UNDERLYING), Some(TokenFlow::Inflow(U256::from(90))));
}

#[test]
fn test_price_moves_along_curve() {
    let current = basket(&[(TOKEN_A, 1000)], 1);
    let next = basket(&[(TOKEN_B, 1)], 1);
    let calculator = AuctionFlowCalculator::default();
    let mut state = AuctionPriceState {
        start_price: U256::from(500),
        pivot_price: U256::from(1500),
        time_to_pivot: 1000,
        price_denominator: U256::from(1000),
        elapsed_time: 0,
    };

    let outflow_at = |state: &AuctionPriceState| {
        calculator
            .compute(&current, &next, U256::from(1), state)
            .unwrap()
            .outflow[0]
    };

    assert_eq!(outflow_at(&state), U256::from(500));
    state.elapsed_time = 1000;
    assert_eq!(outflow_at(&state), U256::from(1500));
    state.elapsed_time = 2000;
    assert_eq!(outflow_at(&state), U256::from(2500));
}

#[test]
fn test_results_are_deterministic_and_aligned() {
    let current = basket(&[(TOKEN_C, 7), (TOKEN_A, 3), (TOKEN_C, 1)], 1);
    let next = basket(&[(TOKEN_B, 2), (TOKEN_A, 9)], 1);
    let calculator = AuctionFlowCalculator::default();

    let first = calculator
        .compute(&current, &next, U256::from(4), &flat_price(750))
        .unwrap();
    let second = calculator
        .compute(&current, &next, U256::from(4), &flat_price(750))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.tokens, vec![TOKEN_C, TOKEN_A, TOKEN_B]);
    assert_eq!(first.inflow.len(), first.tokens.len());
    assert_eq!(first.outflow.len(), first.tokens.len());
    assert!(first.is_consistent());
    // C appears twice in the current basket: (7 + 1) * 4 * 0.75
    assert_eq!(first.flow_of(TOKEN_C), Some(TokenFlow::Outflow(U256::from(24))));
}

#[test]
fn test_invalid_baskets_are_rejected() {
    let good = basket(&[(TOKEN_A, 1)], 1);
    let calculator = AuctionFlowCalculator::default();

    let empty = basket(&[], 1);
    assert!(matches!(
        calculator.compute(&empty, &good, U256::from(1), &flat_price(1000)),
        Err(SetRsError::InvalidBasket(_))
    ));

    let zero_natural_unit = basket(&[(TOKEN_B, 1)], 0);
    assert!(matches!(
        calculator.compute(&good, &zero_natural_unit, U256::from(1), &flat_price(1000)),
        Err(SetRsError::InvalidBasket(_))
    ));
}

#[test]
fn test_invalid_bid_quantities_are_rejected() {
    let calculator = AuctionFlowCalculator::default();
    let current = basket(&[(TOKEN_A, 100)], 10);
    let next = basket(&[(TOKEN_B, 50)], 10);

    for quantity in [0u64, 15] {
        assert!(matches!(
            calculator.compute(&current, &next, U256::from(quantity), &flat_price(1000)),
            Err(SetRsError::InvalidBidQuantity { .. })
        ));
    }

    // multiple of the governing natural unit, but 1 * 10 / 4 leaves a remainder
    let uneven = basket(&[(TOKEN_A, 1)], 4);
    assert!(matches!(
        calculator.compute(&uneven, &next, U256::from(10), &flat_price(1000)),
        Err(SetRsError::InvalidBidQuantity { .. })
    ));
}

#[test]
fn test_missing_exchange_rate_is_rejected() {
    let unpriced = WrappedTokenMapping::unpriced(CTOKEN, UNDERLYING);
    let calculator = AuctionFlowCalculator::new(vec![unpriced]);
    let current = basket(&[(CTOKEN, 100)], 10);
    let next = basket(&[(TOKEN_B, 50)], 10);
    assert!(matches!(
        calculator.compute(&current, &next, U256::from(10), &flat_price(1000)),
        Err(SetRsError::MissingExchangeRate(addr)) if addr == CTOKEN
    ));
}

#[test]
fn test_unreferenced_unpriced_mapping_is_ignored() {
    let unpriced = WrappedTokenMapping::unpriced(CTOKEN, UNDERLYING);
    let calculator = AuctionFlowCalculator::new(vec![unpriced]);
    let current = basket(&[(TOKEN_A, 100)], 10);
    let next = basket(&[(TOKEN_B, 50)], 10);
    let result = calculator.compute(&current, &next, U256::from(10), &flat_price(1000));
    assert!(result.is_ok());
}

#[test]
fn test_overflow_is_reported() {
    let calculator = AuctionFlowCalculator::default();
    let current =
        BasketSnapshot::new(vec![Component::new(TOKEN_A, U256::MAX)], U256::from(1));
    let next = basket(&[(TOKEN_B, 1)], 1);
    assert!(matches!(
        calculator.compute(&current, &next, U256::from(2), &flat_price(1000)),
        Err(SetRsError::ArithmeticOverflow(_))
    ));
}
