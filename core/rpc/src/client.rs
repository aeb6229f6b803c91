use crate::codec;
use async_trait::async_trait;
use helix_abi::MethodDescriptor;
use helix_engine::{DeployedInstance, Transport, TransportError, TxReceipt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// JSON-RPC request
#[derive(Debug, Serialize)]
struct RpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

/// JSON-RPC response
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RpcResponse {
    jsonrpc: String,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
    id: u64,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct RpcError {
    code: i32,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub endpoint: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub receipt_poll_interval: Duration,
    pub receipt_poll_attempts: u32,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            gas_price: 1_000_000_000, // 1 gwei
            gas_limit: 3_000_000,
            receipt_poll_interval: Duration::from_secs(2),
            receipt_poll_attempts: 30,
        }
    }
}

/// Contract-call transport over Ethereum-style JSON-RPC. Accounts are
/// node-managed: writes go through eth_sendTransaction from the
/// authenticated account.
pub struct JsonRpcTransport {
    config: RpcConfig,
    client: Client,
    request_id: AtomicU64,
}

impl JsonRpcTransport {
    pub fn new(config: RpcConfig) -> Self {
        Self {
            config,
            client: Client::new(),
            request_id: AtomicU64::new(1),
        }
    }

    /// Make RPC call
    async fn rpc(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);

        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id,
        };

        debug!("RPC {} (id {})", method, id);

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let rpc_response: RpcResponse = response
            .json()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(TransportError(format!(
                "{}: {}",
                error.code, error.message
            )));
        }

        Ok(rpc_response.result)
    }

    /// Poll until the transaction is mined, or give up
    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Value, TransportError> {
        for _ in 0..self.config.receipt_poll_attempts {
            tokio::time::sleep(self.config.receipt_poll_interval).await;

            let result = self
                .rpc("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if result.is_object() {
                return Ok(result);
            }
        }

        Err(TransportError(format!(
            "transaction receipt for {} not found after {} attempts",
            tx_hash, self.config.receipt_poll_attempts
        )))
    }

    fn tx_object(&self, from: &str, to: Option<&str>, data: &str, value: u128) -> Value {
        let mut tx = json!({
            "from": from,
            "data": data,
            "value": format!("0x{:x}", value),
            "gas": format!("0x{:x}", self.config.gas_limit),
            "gasPrice": format!("0x{:x}", self.config.gas_price),
        });
        if let Some(to) = to {
            tx["to"] = json!(to);
        }
        tx
    }

    async fn submit(
        &self,
        from: &str,
        to: Option<&str>,
        data: &str,
        value: u128,
    ) -> Result<TxReceipt, TransportError> {
        let result = self
            .rpc(
                "eth_sendTransaction",
                json!([self.tx_object(from, to, data, value)]),
            )
            .await?;

        let tx_hash = result
            .as_str()
            .ok_or_else(|| TransportError("invalid transaction hash response".to_string()))?
            .to_string();

        info!("Transaction {} submitted, awaiting confirmation", tx_hash);

        let raw = self.wait_for_receipt(&tx_hash).await?;
        let receipt = receipt_from(&tx_hash, raw);

        if !receipt.status {
            return Err(TransportError(format!("transaction {} reverted", tx_hash)));
        }

        Ok(receipt)
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn call(
        &self,
        to: &str,
        method: &MethodDescriptor,
        args: &[String],
    ) -> Result<Value, TransportError> {
        let data = codec::encode_call(method, args)?;

        let result = self
            .rpc("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await?;

        let raw = result
            .as_str()
            .ok_or_else(|| TransportError("invalid eth_call response".to_string()))?;

        Ok(codec::decode_result(raw))
    }

    async fn send(
        &self,
        to: &str,
        method: &MethodDescriptor,
        args: &[String],
        from: &str,
        value: u128,
    ) -> Result<TxReceipt, TransportError> {
        let data = codec::encode_call(method, args)?;
        self.submit(from, Some(to), &data, value).await
    }

    async fn deploy(
        &self,
        bytecode: &str,
        constructor: &MethodDescriptor,
        args: &[String],
        from: &str,
        value: u128,
    ) -> Result<DeployedInstance, TransportError> {
        // Deployment payload: bytecode followed by the raw constructor
        // argument words, no selector.
        let ctor_args = codec::encode_constructor_args(constructor, args)?;
        let data = format!("0x{}{}", bytecode.trim_start_matches("0x"), ctor_args);

        let receipt = self.submit(from, None, &data, value).await?;

        let address = receipt
            .contract_address
            .clone()
            .ok_or_else(|| TransportError("deployment receipt carries no contract address".to_string()))?;

        Ok(DeployedInstance {
            address,
            transaction_hash: Some(receipt.transaction_hash),
        })
    }
}

/// Shape a raw JSON receipt into the transport's receipt record
fn receipt_from(tx_hash: &str, raw: Value) -> TxReceipt {
    TxReceipt {
        transaction_hash: raw["transactionHash"]
            .as_str()
            .unwrap_or(tx_hash)
            .to_string(),
        status: raw["status"].as_str() == Some("0x1"),
        gas_used: hex_to_u64(&raw["gasUsed"]),
        block_number: hex_to_u64(&raw["blockNumber"]),
        contract_address: raw["contractAddress"].as_str().map(String::from),
        raw,
    }
}

fn hex_to_u64(value: &Value) -> Option<u64> {
    let text = value.as_str()?;
    u64::from_str_radix(text.trim_start_matches("0x"), 16).ok()
}
