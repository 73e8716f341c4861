use alloy_primitives::{U256, U512};

/// Performs a multiplication and division in 512-bit precision.
/// Equivalent to floor((a * b) / denominator).
/// Returns `None` on division by zero or if the quotient does not fit in 256 bits.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Option<U256> {
    mul_div_exact(a, b, denominator).map(|(quotient, _)| quotient)
}

/// Like [`mul_div`], but also returns the remainder of the division so callers
/// can reject inexact results instead of truncating them.
pub fn mul_div_exact(a: U256, b: U256, denominator: U256) -> Option<(U256, U256)> {
    if denominator.is_zero() {
        return None;
    }

    let product = a.widening_mul(b);
    let wide_denominator = U512::from(denominator);
    let quotient = product / wide_denominator;

    if quotient > U512::from(U256::MAX) {
        return None;
    }

    let remainder = product % wide_denominator;
    Some((quotient.to(), remainder.to()))
}
