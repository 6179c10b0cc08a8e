use std::sync::Arc;
use std::time::Duration;

use chainbot_common::cache::HandleCache;
use tracing::info;

use crate::client::Client;
use crate::{ChainReader, Error, NetworkDescriptor, NetworkRegistry};

/// Builds the connection handle of a network
#[derive(Clone)]
pub enum Connector {
    #[cfg(feature = "testing")]
    Mock(crate::testing::MockConnector),

    /// JSON-RPC over HTTP with the given request timeout
    JsonRpc(Duration),
}

impl Connector {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[cfg(feature = "testing")]
    pub fn mock<T: crate::testing::MockChainReader>(reader: T) -> Self {
        Self::Mock(crate::testing::MockConnector::new(reader))
    }

    fn connect(&self, network: &NetworkDescriptor, endpoint: &str) -> Result<Arc<dyn ChainReader>, Error> {
        match self {
            #[cfg(feature = "testing")]
            Self::Mock(connector) => Ok(connector.connect()),

            Self::JsonRpc(timeout) => Ok(Arc::new(Client::new(&network.key, endpoint, *timeout)?)),
        }
    }
}

impl Default for Connector {
    fn default() -> Self {
        Self::JsonRpc(Self::DEFAULT_TIMEOUT)
    }
}

/// Entry point to every network of the registry. Connection handles are built on first use and
/// shared by every later caller, including callers racing on the first use.
#[derive(Clone)]
pub struct Chain {
    registry: Arc<NetworkRegistry>,
    connector: Connector,

    handles: HandleCache<String, Arc<dyn ChainReader>>,
}

impl Chain {
    pub fn new(registry: impl Into<Arc<NetworkRegistry>>, connector: Connector) -> Self {
        let registry = registry.into();
        let capacity = registry.len().max(1) as u64;

        Self {
            registry,
            connector,
            handles: HandleCache::new(capacity),
        }
    }

    pub fn registry(&self) -> &NetworkRegistry {
        &self.registry
    }

    /// Shared handle on the registry, for components that outlive a borrow of the chain
    pub fn shared_registry(&self) -> Arc<NetworkRegistry> {
        self.registry.clone()
    }

    /// Returns the connection handle of `network`. Fails without building anything when the
    /// network is unknown or has no RPC endpoint.
    pub fn acquire(&self, network: &str) -> Result<Arc<dyn ChainReader>, Error> {
        let descriptor = self.registry.lookup(network).ok_or_else(|| Error::UnknownNetwork(network.to_string()))?;
        let endpoint = descriptor
            .rpc_endpoint
            .as_deref()
            .ok_or_else(|| Error::MissingEndpoint(network.to_string()))?;

        self.handles
            .get_or_try_insert_with(network.to_string(), || {
                info!(network, "connecting to {}", descriptor.name);
                self.connector.connect(descriptor, endpoint)
            })
            .map_err(|e| e.as_ref().clone())
    }
}
