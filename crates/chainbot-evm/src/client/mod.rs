use std::time::Duration;

use alloy_primitives::{Address, Bytes, U256, U64};
use async_trait::async_trait;
use chainbot_common::{log_if_error, measure_duration, metric};
use jsonrpsee::core::RpcResult;
use jsonrpsee::http_client::HttpClient;
use jsonrpsee::proc_macros::rpc;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::math::gwei;
use crate::{ChainReader, Error, FeeData};

#[derive(Serialize, Debug, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    Latest,
}

#[derive(Serialize, Debug, Clone)]
pub struct CallRequest {
    pub to: Address,
    pub data: Bytes,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    pub number: U64,

    #[serde(default)]
    pub base_fee_per_gas: Option<U256>,
}

#[rpc(client, namespace = "eth")]
pub trait EthereumApi {
    #[method(name = "getBalance")]
    async fn get_balance(&self, address: Address, block: BlockTag) -> RpcResult<U256>;

    #[method(name = "getCode")]
    async fn get_code(&self, address: Address, block: BlockTag) -> RpcResult<Bytes>;

    #[method(name = "getTransactionCount")]
    async fn get_transaction_count(&self, address: Address, block: BlockTag) -> RpcResult<U64>;

    #[method(name = "blockNumber")]
    async fn block_number(&self) -> RpcResult<U64>;

    #[method(name = "chainId")]
    async fn chain_id(&self) -> RpcResult<U64>;

    #[method(name = "gasPrice")]
    async fn gas_price(&self) -> RpcResult<U256>;

    #[method(name = "maxPriorityFeePerGas")]
    async fn max_priority_fee_per_gas(&self) -> RpcResult<U256>;

    #[method(name = "getBlockByNumber")]
    async fn get_block_by_number(&self, block: BlockTag, full_transactions: bool) -> RpcResult<Option<BlockHeader>>;

    #[method(name = "call")]
    async fn call(&self, request: CallRequest, block: BlockTag) -> RpcResult<Bytes>;
}

/// JSON-RPC client bound to the endpoint of one network
#[derive(Clone)]
pub struct Client {
    network: String,

    inner: HttpClient,
}

impl Client {
    /// Priority fee assumed when the node does not implement `eth_maxPriorityFeePerGas`
    pub const DEFAULT_PRIORITY_FEE_GWEI: u64 = 1;

    pub fn new(network: &str, endpoint: &str, timeout: Duration) -> Result<Self, Error> {
        let inner = HttpClient::builder()
            .request_timeout(timeout)
            .build(endpoint)
            .map_err(|e| Error::InvalidEndpoint(network.to_string(), e.to_string()))?;

        Ok(Self {
            network: network.to_string(),
            inner,
        })
    }

    pub fn network(&self) -> &str {
        &self.network
    }
}

#[async_trait]
impl ChainReader for Client {
    #[instrument(name = "balance", skip(self), fields(network = %self.network))]
    async fn balance(&self, address: Address) -> Result<U256, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.get_balance(address, BlockTag::Latest).await));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "get_balance", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "get_balance", network = self.network.as_str());

        Ok(result?)
    }

    #[instrument(name = "code", skip(self), fields(network = %self.network))]
    async fn code(&self, address: Address) -> Result<Bytes, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.get_code(address, BlockTag::Latest).await));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "get_code", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "get_code", network = self.network.as_str());

        Ok(result?)
    }

    #[instrument(name = "transaction_count", skip(self), fields(network = %self.network))]
    async fn transaction_count(&self, address: Address) -> Result<u64, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.get_transaction_count(address, BlockTag::Latest).await));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "get_transaction_count", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "get_transaction_count", network = self.network.as_str());

        Ok(result?.to::<u64>())
    }

    #[instrument(name = "block_number", skip(self), fields(network = %self.network))]
    async fn block_number(&self) -> Result<u64, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.block_number().await));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "block_number", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "block_number", network = self.network.as_str());

        Ok(result?.to::<u64>())
    }

    /// Gas price of the network. When the latest block exposes a base fee, EIP-1559 fields are
    /// derived as `maxFeePerGas = 2 * baseFee + maxPriorityFeePerGas`.
    #[instrument(name = "fee_data", skip(self), fields(network = %self.network))]
    async fn fee_data(&self) -> Result<FeeData, Error> {
        let (result, duration) = measure_duration!(log_if_error!(tokio::try_join!(
            self.inner.gas_price(),
            self.inner.get_block_by_number(BlockTag::Latest, false)
        )));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "fee_data", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "fee_data", network = self.network.as_str());

        let (gas_price, block) = result?;
        let Some(base_fee) = block.and_then(|x| x.base_fee_per_gas) else {
            return Ok(FeeData {
                gas_price,
                ..FeeData::default()
            });
        };

        let priority_fee = self
            .inner
            .max_priority_fee_per_gas()
            .await
            .unwrap_or_else(|_| gwei(Self::DEFAULT_PRIORITY_FEE_GWEI));

        Ok(FeeData {
            gas_price,
            max_fee_per_gas: Some(base_fee * U256::from(2u64) + priority_fee),
            max_priority_fee_per_gas: Some(priority_fee),
        })
    }

    #[instrument(name = "chain_id", skip(self), fields(network = %self.network))]
    async fn chain_id(&self) -> Result<u64, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.chain_id().await));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "chain_id", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "chain_id", network = self.network.as_str());

        Ok(result?.to::<u64>())
    }

    #[instrument(name = "call", skip(self, data), fields(network = %self.network))]
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
        let (result, duration) = measure_duration!(log_if_error!(self.inner.call(CallRequest { to, data }, BlockTag::Latest).await));

        metric!(histogram[chain_rpc] = duration.as_millis(), method = "call", network = self.network.as_str());
        metric!(on error result => counter [ chain_rpc_error ] = 1, method = "call", network = self.network.as_str());

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use alloy_primitives::{address, Address, Bytes, U256};
    use serde_json::{json, Value};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

    use crate::math::gwei;
    use crate::{ChainReader, Client, Error};

    const ACCOUNT: Address = address!("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");

    /// Answers each JSON-RPC request with the canned payload registered for its method, echoing
    /// the request id.
    struct Node {
        results: HashMap<&'static str, Value>,
        errors: HashMap<&'static str, &'static str>,
    }

    impl Node {
        fn new() -> Self {
            Self {
                results: HashMap::new(),
                errors: HashMap::new(),
            }
        }

        fn result(mut self, method: &'static str, value: Value) -> Self {
            self.results.insert(method, value);
            self
        }

        fn error(mut self, method: &'static str, message: &'static str) -> Self {
            self.errors.insert(method, message);
            self
        }

        async fn start(self) -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("POST")).respond_with(self).mount(&server).await;
            server
        }
    }

    impl Respond for Node {
        fn respond(&self, request: &Request) -> ResponseTemplate {
            let body: Value = serde_json::from_slice(&request.body).unwrap();
            let id = body["id"].clone();
            let method = body["method"].as_str().unwrap_or_default();

            if let Some(message) = self.errors.get(method) {
                return ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32000, "message": message } }));
            }

            match self.results.get(method) {
                Some(result) => ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": id, "result": result })),
                None => ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": id, "error": { "code": -32601, "message": "the method does not exist" } })),
            }
        }
    }

    fn client(server: &MockServer) -> Client {
        Client::new("sepolia", &server.uri(), Duration::from_secs(5)).unwrap()
    }

    mod new {
        use super::*;

        #[test]
        fn should_reject_invalid_endpoint() {
            let result = Client::new("sepolia", "not a url", Duration::from_secs(1));

            assert!(matches!(result, Err(Error::InvalidEndpoint(network, _)) if network == "sepolia"));
        }
    }

    mod reads {
        use super::*;

        #[tokio::test]
        async fn should_decode_quantities() {
            let server = Node::new()
                .result("eth_getBalance", json!("0xde0b6b3a7640000"))
                .result("eth_getTransactionCount", json!("0x2a"))
                .result("eth_blockNumber", json!("0x10"))
                .result("eth_chainId", json!("0xaa36a7"))
                .start()
                .await;
            let client = client(&server);

            assert_eq!(client.balance(ACCOUNT).await.unwrap(), U256::from(1_000_000_000_000_000_000u128));
            assert_eq!(client.transaction_count(ACCOUNT).await.unwrap(), 42);
            assert_eq!(client.block_number().await.unwrap(), 16);
            assert_eq!(client.chain_id().await.unwrap(), 11155111);
        }

        #[tokio::test]
        async fn should_decode_code_and_call_output() {
            let server = Node::new()
                .result("eth_getCode", json!("0x6080"))
                .result("eth_call", json!("0x"))
                .start()
                .await;
            let client = client(&server);

            assert_eq!(client.code(ACCOUNT).await.unwrap(), Bytes::from(vec![0x60, 0x80]));
            assert!(client.call(ACCOUNT, Bytes::new()).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn should_surface_node_error_message() {
            let server = Node::new().error("eth_getBalance", "execution reverted").start().await;

            let result = client(&server).balance(ACCOUNT).await;

            assert_eq!(result, Err(Error::Rpc("execution reverted".to_string())));
        }
    }

    mod fee_data {
        use super::*;

        #[tokio::test]
        async fn should_derive_eip1559_fields_from_base_fee() {
            // Given a node with a 10 gwei base fee and a 2 gwei priority fee
            let server = Node::new()
                .result("eth_gasPrice", json!("0x2cb417800"))
                .result("eth_getBlockByNumber", json!({ "number": "0x10", "baseFeePerGas": "0x2540be400" }))
                .result("eth_maxPriorityFeePerGas", json!("0x77359400"))
                .start()
                .await;

            // When
            let fee = client(&server).fee_data().await.unwrap();

            // Then
            assert_eq!(fee.gas_price, gwei(12));
            assert_eq!(fee.max_priority_fee_per_gas, Some(gwei(2)));
            assert_eq!(fee.max_fee_per_gas, Some(gwei(22)));
        }

        #[tokio::test]
        async fn should_default_priority_fee_when_node_lacks_it() {
            let server = Node::new()
                .result("eth_gasPrice", json!("0x2cb417800"))
                .result("eth_getBlockByNumber", json!({ "number": "0x10", "baseFeePerGas": "0x2540be400" }))
                .start()
                .await;

            let fee = client(&server).fee_data().await.unwrap();

            assert_eq!(fee.max_priority_fee_per_gas, Some(gwei(Client::DEFAULT_PRIORITY_FEE_GWEI)));
            assert_eq!(fee.max_fee_per_gas, Some(gwei(21)));
        }

        #[tokio::test]
        async fn should_only_report_gas_price_without_base_fee() {
            let server = Node::new()
                .result("eth_gasPrice", json!("0x2cb417800"))
                .result("eth_getBlockByNumber", json!({ "number": "0x10" }))
                .start()
                .await;

            let fee = client(&server).fee_data().await.unwrap();

            assert_eq!(fee.gas_price, gwei(12));
            assert_eq!(fee.max_fee_per_gas, None);
            assert_eq!(fee.max_priority_fee_per_gas, None);
        }
    }
}
