use std::collections::HashMap;

use async_trait::async_trait;
use chainbot_evm::alloy_primitives::Address;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Network of a link saved without an explicit network
pub const DEFAULT_NETWORK: &str = "mainnet";

/// A wallet address linked to a chat user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletLink {
    pub address: Address,
    pub network: String,
    pub verified_at: DateTime<Utc>,
}

#[async_trait]
pub trait WalletStore: 'static + Send + Sync {
    /// Links `address` to `user_id`, replacing any previous link. An empty network falls back to
    /// [`DEFAULT_NETWORK`].
    async fn save(&self, user_id: &str, address: Address, network: &str) -> WalletLink;

    async fn get(&self, user_id: &str) -> Option<WalletLink>;

    /// Removes the link of `user_id`, returning whether one existed
    async fn remove(&self, user_id: &str) -> bool;

    async fn all(&self) -> HashMap<String, WalletLink>;
}

/// Process-lifetime wallet store
#[derive(Debug, Default)]
pub struct MemoryWalletStore {
    links: RwLock<HashMap<String, WalletLink>>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn save(&self, user_id: &str, address: Address, network: &str) -> WalletLink {
        let link = WalletLink {
            address,
            network: if network.is_empty() { DEFAULT_NETWORK } else { network }.to_string(),
            verified_at: Utc::now(),
        };

        self.links.write().await.insert(user_id.to_string(), link.clone());
        link
    }

    async fn get(&self, user_id: &str) -> Option<WalletLink> {
        self.links.read().await.get(user_id).cloned()
    }

    async fn remove(&self, user_id: &str) -> bool {
        self.links.write().await.remove(user_id).is_some()
    }

    async fn all(&self) -> HashMap<String, WalletLink> {
        self.links.read().await.clone()
    }
}
