use crate::errors::SetRsError;
use alloy_primitives::Address;
use serde::Deserialize;
use std::path::Path;
use url::Url;

fn default_contract_cache_size() -> usize {
    64
}

fn default_gas_limit() -> u64 {
    6_000_000
}

/// Deployed bidder helper contracts.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BidderAddresses {
    pub standard: Address,
    pub ctoken: Address,
    pub ether: Address,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CTokenUnderlying {
    pub ctoken: Address,
    pub underlying: Address,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SdkConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub bidders: BidderAddresses,
    pub weth: Address,
    #[serde(default)]
    pub ctoken_underlyings: Vec<CTokenUnderlying>,
    #[serde(default = "default_contract_cache_size")]
    pub contract_cache_size: usize,
    #[serde(default = "default_gas_limit")]
    pub default_gas_limit: u64,
}

impl SdkConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SetRsError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SetRsError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SetRsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SetRsError::ConfigError(format!("reading {}: {e}", path.display())))?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), SetRsError> {
        if self.contract_cache_size == 0 {
            return Err(SetRsError::ConfigError("contractCacheSize must be positive".into()));
        }
        let bidders = [
            ("standard", self.bidders.standard),
            ("ctoken", self.bidders.ctoken),
            ("ether", self.bidders.ether),
        ];
        if let Some((name, _)) = bidders.iter().find(|(_, addr)| addr.is_zero()) {
            return Err(SetRsError::ConfigError(format!("{name} bidder address is zero")));
        }
        Ok(())
    }

    pub fn ctoken_underlying(&self, ctoken: Address) -> Option<Address> {
        self.ctoken_underlyings
            .iter()
            .find(|m| m.ctoken == ctoken)
            .map(|m| m.underlying)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const CONFIG: &str = r#"{
        "rpcUrl": "http://127.0.0.1:8545",
        "chainId": 1,
        "bidders": {
            "standard": "0x0000000000000000000000000000000000000b01",
            "ctoken": "0x0000000000000000000000000000000000000b02",
            "ether": "0x0000000000000000000000000000000000000b03"
        },
        "weth": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
        "ctokenUnderlyings": [
            {
                "ctoken": "0x5d3a536E4D6DbD6114cc1Ead35777bAB948E3643",
                "underlying": "0x6B175474E89094C44Da98b954EedeAC495271d0F"
            }
        ]
    }"#;

    #[test]
    fn parses_with_defaults() {
        let config = SdkConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.contract_cache_size, 64);
        assert_eq!(config.default_gas_limit, 6_000_000);
        assert_eq!(
            config.ctoken_underlying(address!("5d3a536E4D6DbD6114cc1Ead35777bAB948E3643")),
            Some(address!("6B175474E89094C44Da98b954EedeAC495271d0F"))
        );
    }

    #[test]
    fn rejects_zero_cache_size() {
        let json = CONFIG.replacen(
            "\"chainId\": 1,",
            "\"chainId\": 1, \"contractCacheSize\": 0,",
            1,
        );
        assert!(matches!(SdkConfig::from_json_str(&json), Err(SetRsError::ConfigError(_))));
    }

    #[test]
    fn rejects_zero_bidder() {
        let json = CONFIG.replace(
            "0x0000000000000000000000000000000000000b02",
            "0x0000000000000000000000000000000000000000",
        );
        assert!(matches!(SdkConfig::from_json_str(&json), Err(SetRsError::ConfigError(_))));
    }
}
