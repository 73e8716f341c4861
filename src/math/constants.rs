use alloy_primitives::{Address, U256};

/// Fixed-point scale of cToken exchange rates (10^18).
pub const EXCHANGE_RATE_SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Placeholder address reported for native ether in flow results.
pub const ETHER_PLACEHOLDER: Address = Address::ZERO;
