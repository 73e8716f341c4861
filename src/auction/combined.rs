use crate::core::basket::BasketSnapshot;
use alloy_primitives::Address;
use itertools::Itertools;

/// Deduplicated union of both baskets' component addresses.
///
/// Current-basket addresses come first in their declared order, followed by
/// next-basket-only addresses in next-basket order. Addresses are compared as-is;
/// callers must hand in normalized addresses.
pub fn combine_token_addresses(current: &BasketSnapshot, next: &BasketSnapshot) -> Vec<Address> {
    current.addresses().chain(next.addresses()).unique().collect()
}
