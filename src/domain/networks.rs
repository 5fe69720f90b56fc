//! Built-in network catalogue.
//!
//! Entries with a `deployment_cost` are valid meme coin deployment targets;
//! the rest are only seeded into the `networks` table for token deployments.

use serde::Serialize;

const GWEI: u128 = 1_000_000_000;

/// Gas limit assumed for a generated ERC-20 deployment.
pub const DEFAULT_GAS_LIMIT: i64 = 500_000;
/// Gas price used when the network has no better figure (20 gwei).
pub const DEFAULT_GAS_PRICE_WEI: u128 = 20 * GWEI;

#[derive(Debug, Clone, Serialize)]
pub struct NetworkInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub currency: &'static str,
    pub chain_id: u64,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    #[serde(serialize_with = "serialize_wei")]
    pub gas_price_wei: u128,
    /// Flat deployment price in native currency, `None` if meme coins cannot target it.
    pub deployment_cost: Option<f64>,
}

fn serialize_wei<S: serde::Serializer>(wei: &u128, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&wei.to_string())
}

pub const CATALOGUE: &[NetworkInfo] = &[
    NetworkInfo {
        name: "ethereum",
        display_name: "Ethereum Mainnet",
        currency: "ETH",
        chain_id: 1,
        rpc_url: "https://mainnet.infura.io/v3/",
        explorer_url: "https://etherscan.io",
        gas_price_wei: 20 * GWEI,
        deployment_cost: Some(0.05),
    },
    NetworkInfo {
        name: "bsc",
        display_name: "Binance Smart Chain",
        currency: "BNB",
        chain_id: 56,
        rpc_url: "https://bsc-dataseed.binance.org/",
        explorer_url: "https://bscscan.com",
        gas_price_wei: 5 * GWEI,
        deployment_cost: Some(0.01),
    },
    NetworkInfo {
        name: "polygon",
        display_name: "Polygon Mainnet",
        currency: "MATIC",
        chain_id: 137,
        rpc_url: "https://polygon-rpc.com/",
        explorer_url: "https://polygonscan.com",
        gas_price_wei: 30 * GWEI,
        deployment_cost: Some(0.01),
    },
    NetworkInfo {
        name: "arbitrum",
        display_name: "Arbitrum One",
        currency: "ETH",
        chain_id: 42161,
        rpc_url: "https://arb1.arbitrum.io/rpc",
        explorer_url: "https://arbiscan.io",
        gas_price_wei: GWEI,
        deployment_cost: Some(0.01),
    },
    NetworkInfo {
        name: "optimism",
        display_name: "Optimism",
        currency: "ETH",
        chain_id: 10,
        rpc_url: "https://mainnet.optimism.io",
        explorer_url: "https://optimistic.etherscan.io",
        gas_price_wei: GWEI,
        deployment_cost: Some(0.01),
    },
    NetworkInfo {
        name: "avalanche",
        display_name: "Avalanche C-Chain",
        currency: "AVAX",
        chain_id: 43114,
        rpc_url: "https://api.avax.network/ext/bc/C/rpc",
        explorer_url: "https://snowtrace.io",
        gas_price_wei: 25 * GWEI,
        deployment_cost: None,
    },
    NetworkInfo {
        name: "goerli",
        display_name: "Ethereum Goerli Testnet",
        currency: "ETH",
        chain_id: 5,
        rpc_url: "https://goerli.infura.io/v3/",
        explorer_url: "https://goerli.etherscan.io",
        gas_price_wei: 20 * GWEI,
        deployment_cost: None,
    },
    NetworkInfo {
        name: "bsc-testnet",
        display_name: "BSC Testnet",
        currency: "BNB",
        chain_id: 97,
        rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545/",
        explorer_url: "https://testnet.bscscan.com",
        gas_price_wei: 10 * GWEI,
        deployment_cost: None,
    },
];

pub fn lookup(name: &str) -> Option<&'static NetworkInfo> {
    CATALOGUE.iter().find(|n| n.name == name)
}

/// Names of the networks a meme coin may be deployed to.
pub fn deployment_networks() -> impl Iterator<Item = &'static str> {
    CATALOGUE
        .iter()
        .filter(|n| n.deployment_cost.is_some())
        .map(|n| n.name)
}

pub fn deployment_cost(name: &str) -> Option<f64> {
    lookup(name).and_then(|n| n.deployment_cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deployment_targets_are_the_five_priced_networks() {
        let names: Vec<_> = deployment_networks().collect();
        assert_eq!(names, vec!["ethereum", "bsc", "polygon", "arbitrum", "optimism"]);
    }

    #[test]
    fn ethereum_costs_more_than_l2s() {
        assert_eq!(deployment_cost("ethereum"), Some(0.05));
        assert_eq!(deployment_cost("arbitrum"), Some(0.01));
        assert_eq!(deployment_cost("goerli"), None);
        assert_eq!(deployment_cost("solana"), None);
    }

    #[test]
    fn chain_ids_are_unique() {
        let mut ids: Vec<u64> = CATALOGUE.iter().map(|n| n.chain_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), CATALOGUE.len());
    }

    #[test]
    fn gas_price_serializes_as_decimal_string() {
        let v = serde_json::to_value(lookup("bsc").unwrap()).unwrap();
        assert_eq!(v["gas_price_wei"], "5000000000");
    }
}
