use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;

use crate::{ChainReader, Error, FeeData};

/// Scriptable chain. Every read defaults to `unimplemented!()` so a test only implements the
/// calls it expects.
#[async_trait]
pub trait MockChainReader: 'static + Send + Sync + Debug {
    async fn balance(&self, _address: Address) -> Result<U256, Error> {
        unimplemented!()
    }

    async fn code(&self, _address: Address) -> Result<Bytes, Error> {
        unimplemented!()
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, Error> {
        unimplemented!()
    }

    async fn block_number(&self) -> Result<u64, Error> {
        unimplemented!()
    }

    async fn fee_data(&self) -> Result<FeeData, Error> {
        unimplemented!()
    }

    async fn chain_id(&self) -> Result<u64, Error> {
        unimplemented!()
    }

    async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes, Error> {
        unimplemented!()
    }
}

/// [`ChainReader`] backed by a [`MockChainReader`]
#[derive(Clone, Debug)]
pub struct MockClient(Arc<dyn MockChainReader>);

impl MockClient {
    pub fn new<T: MockChainReader>(reader: T) -> Self {
        Self(Arc::new(reader))
    }
}

#[async_trait]
impl ChainReader for MockClient {
    async fn balance(&self, address: Address) -> Result<U256, Error> {
        self.0.balance(address).await
    }

    async fn code(&self, address: Address) -> Result<Bytes, Error> {
        self.0.code(address).await
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, Error> {
        self.0.transaction_count(address).await
    }

    async fn block_number(&self) -> Result<u64, Error> {
        self.0.block_number().await
    }

    async fn fee_data(&self) -> Result<FeeData, Error> {
        self.0.fee_data().await
    }

    async fn chain_id(&self) -> Result<u64, Error> {
        self.0.chain_id().await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
        self.0.call(to, data).await
    }
}

/// Connects every network to the same [`MockChainReader`] and counts the connections made.
#[derive(Clone, Debug)]
pub struct MockConnector {
    client: MockClient,
    connections: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new<T: MockChainReader>(reader: T) -> Self {
        Self {
            client: MockClient::new(reader),
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of handles built so far
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    pub(crate) fn connect(&self) -> Arc<dyn ChainReader> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Arc::new(self.client.clone())
    }
}

/// A reader that must never be reached
#[derive(Debug)]
pub struct Unreachable;

#[async_trait]
impl MockChainReader for Unreachable {}
