use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Represent one network the bot can talk to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDescriptor {
    pub key: String,
    pub name: String,
    pub chain_id: u64,

    #[serde(default)]
    pub rpc_endpoint: Option<String>,

    #[serde(default)]
    pub explorer_url: Option<String>,

    #[serde(default)]
    pub testnet: bool,

    #[serde(default)]
    pub faucet_url: Option<String>,
}

impl NetworkDescriptor {
    /// Ticker of the native currency
    pub fn native_ticker(&self) -> &'static str {
        if self.key.to_lowercase().contains("polygon") {
            "MATIC"
        } else {
            "ETH"
        }
    }

    /// Link to the explorer page of `address`
    pub fn address_url(&self, address: &str) -> Option<String> {
        self.explorer_url.as_ref().map(|x| format!("{}/address/{}", x, address))
    }

    /// Link to the explorer page of the token at `address`
    pub fn token_url(&self, address: &str) -> Option<String> {
        self.explorer_url.as_ref().map(|x| format!("{}/token/{}", x, address))
    }
}

/// Endpoints the operator supplies for the default networks. Every value is optional; a network
/// without RPC endpoint stays listed but cannot be connected to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Endpoints {
    pub eth_mainnet_rpc: Option<String>,
    pub eth_sepolia_rpc: Option<String>,
    pub eth_goerli_rpc: Option<String>,
    pub polygon_amoy_rpc: Option<String>,
    pub base_sepolia_rpc: Option<String>,

    pub sepolia_faucet_url: Option<String>,
    pub polygon_amoy_faucet_url: Option<String>,
    pub base_sepolia_faucet_url: Option<String>,
}

/// Ordered set of the networks known to the bot, indexed by key.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    networks: IndexMap<String, NetworkDescriptor>,
}

impl NetworkRegistry {
    pub const GOERLI_FAUCET_URL: &'static str = "https://faucet.quicknode.com/ethereum/goerli";

    /// Build a registry from the given descriptors. When two descriptors share a key, the last one wins
    /// but keeps the position of the first.
    pub fn new(networks: impl IntoIterator<Item = NetworkDescriptor>) -> Self {
        Self {
            networks: networks.into_iter().map(|x| (x.key.clone(), x)).collect(),
        }
    }

    /// The default Ethereum networks, wired to the given endpoints
    pub fn ethereum(endpoints: &Endpoints) -> Self {
        Self::new(vec![
            NetworkDescriptor {
                key: "mainnet".to_string(),
                name: "Ethereum Mainnet".to_string(),
                chain_id: 1,
                rpc_endpoint: endpoints.eth_mainnet_rpc.clone(),
                explorer_url: Some("https://etherscan.io".to_string()),
                testnet: false,
                faucet_url: None,
            },
            NetworkDescriptor {
                key: "sepolia".to_string(),
                name: "Sepolia Testnet".to_string(),
                chain_id: 11155111,
                rpc_endpoint: endpoints.eth_sepolia_rpc.clone(),
                explorer_url: Some("https://sepolia.etherscan.io".to_string()),
                testnet: true,
                faucet_url: endpoints.sepolia_faucet_url.clone(),
            },
            NetworkDescriptor {
                key: "goerli".to_string(),
                name: "Goerli Testnet".to_string(),
                chain_id: 5,
                rpc_endpoint: endpoints.eth_goerli_rpc.clone(),
                explorer_url: Some("https://goerli.etherscan.io".to_string()),
                testnet: true,
                faucet_url: Some(Self::GOERLI_FAUCET_URL.to_string()),
            },
            NetworkDescriptor {
                key: "polygonAmoy".to_string(),
                name: "Polygon Amoy Testnet".to_string(),
                chain_id: 80002,
                rpc_endpoint: endpoints.polygon_amoy_rpc.clone(),
                explorer_url: Some("https://amoy.polygonscan.com".to_string()),
                testnet: true,
                faucet_url: endpoints.polygon_amoy_faucet_url.clone(),
            },
            NetworkDescriptor {
                key: "baseSepolia".to_string(),
                name: "Base Sepolia Testnet".to_string(),
                chain_id: 84532,
                rpc_endpoint: endpoints.base_sepolia_rpc.clone(),
                explorer_url: Some("https://sepolia.basescan.org".to_string()),
                testnet: true,
                faucet_url: endpoints.base_sepolia_faucet_url.clone(),
            },
        ])
    }

    pub fn lookup(&self, key: &str) -> Option<&NetworkDescriptor> {
        self.networks.get(key)
    }

    /// Every key, in declaration order
    pub fn keys(&self) -> Vec<&str> {
        self.networks.keys().map(String::as_str).collect()
    }

    /// Keys of the testnets, in declaration order
    pub fn testnet_keys(&self) -> Vec<&str> {
        self.networks.values().filter(|x| x.testnet).map(|x| x.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkDescriptor> {
        self.networks.values()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
