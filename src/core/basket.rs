use crate::errors::SetRsError;
use alloy_primitives::{Address, U256};

/// A token contributing to a basket together with its quantity per natural unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    pub address: Address,
    pub unit: U256,
}

impl Component {
    pub fn new(address: Address, unit: U256) -> Self {
        Self { address, unit }
    }
}

/// Composition of a Set at a given block: either the basket being rebalanced out of
/// (current) or the one being rebalanced into (next).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasketSnapshot {
    pub components: Vec<Component>,
    pub natural_unit: U256,
}

impl BasketSnapshot {
    pub fn new(components: Vec<Component>, natural_unit: U256) -> Self {
        Self {
            components,
            natural_unit,
        }
    }

    /// Zips the parallel `getComponents()` / `getUnits()` arrays a Set token returns.
    pub fn from_parts(
        addresses: Vec<Address>,
        units: Vec<U256>,
        natural_unit: U256,
    ) -> Result<Self, SetRsError> {
        if addresses.len() != units.len() {
            return Err(SetRsError::InvalidBasket(format!(
                "{} components but {} units",
                addresses.len(),
                units.len()
            )));
        }
        let components = addresses
            .into_iter()
            .zip(units)
            .map(|(address, unit)| Component::new(address, unit))
            .collect();
        Ok(Self::new(components, natural_unit))
    }

    pub fn validate(&self) -> Result<(), SetRsError> {
        if self.components.is_empty() {
            return Err(SetRsError::InvalidBasket("basket has no components".into()));
        }
        if self.natural_unit.is_zero() {
            return Err(SetRsError::InvalidBasket("natural unit must be positive".into()));
        }
        Ok(())
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.components.iter().map(|c| c.address)
    }

    /// Units of `address` per natural unit. Repeated entries are summed; absent tokens are zero.
    pub fn unit_of(&self, address: Address) -> Result<U256, SetRsError> {
        self.components
            .iter()
            .filter(|c| c.address == address)
            .try_fold(U256::ZERO, |acc, c| {
                acc.checked_add(c.unit).ok_or_else(|| {
                    SetRsError::ArithmeticOverflow(format!("summing units of {address}"))
                })
            })
    }

    pub fn contains(&self, address: Address) -> bool {
        self.components.iter().any(|c| c.address == address)
    }
}
