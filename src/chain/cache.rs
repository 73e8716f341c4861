use crate::core::basket::BasketSnapshot;
use alloy_primitives::Address;
use lru::LruCache;
use std::fmt::{self, Debug};
use std::num::NonZeroUsize;
use tokio::sync::Mutex;

pub const DEFAULT_CONTRACT_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(64).unwrap();

/// Bounded, address-keyed cache of Set token compositions.
///
/// A Set token's components, units and natural unit never change after deployment, so
/// entries stay valid for any block; only the rebalancing Set's pointers move.
pub struct ContractCache {
    baskets: Mutex<LruCache<Address, BasketSnapshot>>,
}

impl Debug for ContractCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.baskets.try_lock().map_or(0, |c| c.len());
        f.debug_struct("ContractCache").field("len", &len).finish()
    }
}

impl ContractCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            baskets: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub async fn get(&self, set: Address) -> Option<BasketSnapshot> {
        self.baskets.lock().await.get(&set).cloned()
    }

    pub async fn insert(&self, set: Address, basket: BasketSnapshot) {
        self.baskets.lock().await.put(set, basket);
    }

    pub async fn len(&self) -> usize {
        self.baskets.lock().await.len()
    }

}

impl Default for ContractCache {
    fn default() -> Self {
        Self::new(DEFAULT_CONTRACT_CACHE_SIZE)
    }
}
