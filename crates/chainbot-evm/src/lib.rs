use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use jsonrpsee::core::ClientError;
use thiserror::Error;

pub use alloy_primitives;
pub use alloy_sol_types;
pub use tracing;

mod address;
pub use address::{is_valid_address, parse_address};

mod chain;
pub use chain::{Chain, Connector};

mod client;
pub use client::Client;

pub mod contract;
pub mod math;

mod network;
pub use network::{Endpoints, NetworkDescriptor, NetworkRegistry};

#[cfg(feature = "testing")]
pub mod testing;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown network {0}")]
    UnknownNetwork(String),

    #[error("no RPC endpoint configured for network {0}")]
    MissingEndpoint(String),

    #[error("invalid RPC endpoint for network {0}: {1}")]
    InvalidEndpoint(String, String),

    #[error("{0}")]
    Rpc(String),

    #[error("could not decode result data: {0}")]
    Decoding(String),
}

impl Error {
    /// Returns true when the failure comes from the bot configuration rather than from the chain.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownNetwork(_) | Self::MissingEndpoint(_) | Self::InvalidEndpoint(_, _))
    }
}

impl From<ClientError> for Error {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Call(error) => Error::Rpc(error.message().to_string()),
            ClientError::ParseError(error) => Error::Decoding(error.to_string()),
            e => Error::Rpc(e.to_string()),
        }
    }
}

/// Fee parameters of the latest block. EIP-1559 fields are only present on networks that
/// expose a base fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeData {
    pub gas_price: U256,
    pub max_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
}

/// Read-only access to a single network. Implementations are shared between every invocation
/// that targets the same network.
#[async_trait]
pub trait ChainReader: 'static + Send + Sync {
    /// Balance of `address` at the latest block, in wei
    async fn balance(&self, address: Address) -> Result<U256, Error>;

    /// Deployed bytecode at `address`, empty for externally owned accounts
    async fn code(&self, address: Address) -> Result<Bytes, Error>;

    async fn transaction_count(&self, address: Address) -> Result<u64, Error>;

    async fn block_number(&self) -> Result<u64, Error>;

    async fn fee_data(&self) -> Result<FeeData, Error>;

    /// Chain id reported by the endpoint itself
    async fn chain_id(&self) -> Result<u64, Error>;

    /// Executes a read-only call against `to` at the latest block
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error>;
}
