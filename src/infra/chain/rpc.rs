//! Read-only Ethereum JSON-RPC over HTTP.

use async_trait::async_trait;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("{method} request failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} returned error {code}: {message}")]
    Remote {
        method: &'static str,
        code: i64,
        message: String,
    },
    #[error("{method} returned an unreadable result: {detail}")]
    Decode {
        method: &'static str,
        detail: String,
    },
}

/// The queries the services make against a network's RPC endpoint.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Current gas price in wei (`eth_gasPrice`).
    async fn gas_price(&self, rpc_url: &str) -> Result<U256, RpcError>;
    /// Latest balance in wei (`eth_getBalance`).
    async fn balance(&self, rpc_url: &str, address: &str) -> Result<U256, RpcError>;
    async fn chain_id(&self, rpc_url: &str) -> Result<u64, RpcError>;
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: JsonValue,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<JsonValue>,
    #[serde(default)]
    error: Option<JsonRpcErrorBody>,
}

/// Parses an Ethereum QUANTITY (`0x`-prefixed hex, no leading zeros required).
pub fn parse_quantity(method: &'static str, value: &JsonValue) -> Result<U256, RpcError> {
    let decode = |detail: String| RpcError::Decode { method, detail };
    let raw = value
        .as_str()
        .ok_or_else(|| decode(format!("expected hex string, got {value}")))?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| decode(format!("missing 0x prefix in '{raw}'")))?;
    if digits.is_empty() {
        return Err(decode("empty quantity".into()));
    }
    U256::from_str_radix(digits, 16).map_err(|e| decode(format!("'{raw}': {e}")))
}

pub struct EvmRpcClient {
    http: reqwest::Client,
    next_id: AtomicU64,
}

impl EvmRpcClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            next_id: AtomicU64::new(1),
        })
    }

    async fn call(
        &self,
        rpc_url: &str,
        method: &'static str,
        params: JsonValue,
    ) -> Result<JsonValue, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        tracing::debug!(method, rpc_url, id = request.id, "JSON-RPC call");

        let transport = |source| RpcError::Transport { method, source };
        let response: JsonRpcResponse = self
            .http
            .post(rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .json()
            .await
            .map_err(transport)?;

        if let Some(err) = response.error {
            return Err(RpcError::Remote {
                method,
                code: err.code,
                message: err.message,
            });
        }
        response.result.ok_or(RpcError::Decode {
            method,
            detail: "response has neither result nor error".into(),
        })
    }
}

#[async_trait]
impl ChainRpc for EvmRpcClient {
    async fn gas_price(&self, rpc_url: &str) -> Result<U256, RpcError> {
        let result = self.call(rpc_url, "eth_gasPrice", json!([])).await?;
        parse_quantity("eth_gasPrice", &result)
    }

    async fn balance(&self, rpc_url: &str, address: &str) -> Result<U256, RpcError> {
        let result = self
            .call(rpc_url, "eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity("eth_getBalance", &result)
    }

    async fn chain_id(&self, rpc_url: &str) -> Result<u64, RpcError> {
        let result = self.call(rpc_url, "eth_chainId", json!([])).await?;
        let id = parse_quantity("eth_chainId", &result)?;
        if id > U256::from(u64::MAX) {
            return Err(RpcError::Decode {
                method: "eth_chainId",
                detail: format!("chain id {id} exceeds u64"),
            });
        }
        Ok(id.as_u64())
    }
}
