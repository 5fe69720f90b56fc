//! Shared harness: a real server on an ephemeral port backed by the in-memory store.

#![allow(dead_code)]

use async_trait::async_trait;
use memecoin_creator::infra::chain::{ChainRpc, RpcError};
use memecoin_creator::infra::config::Config;
use memecoin_creator::storage::seed::seed_networks;
use memecoin_creator::{create_router, AppState, MemoryStore, Storage};
use primitive_types::U256;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Offline RPC: every network reports a fixed gas price and a 2 ETH balance.
pub struct OfflineRpc;

#[async_trait]
impl ChainRpc for OfflineRpc {
    async fn gas_price(&self, _rpc_url: &str) -> Result<U256, RpcError> {
        Ok(U256::from(12_000_000_000u64))
    }

    async fn balance(&self, _rpc_url: &str, _address: &str) -> Result<U256, RpcError> {
        Ok(U256::from(2u64) * U256::exp10(18))
    }

    async fn chain_id(&self, _rpc_url: &str) -> Result<u64, RpcError> {
        Ok(1)
    }
}

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub store: Arc<dyn Storage>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn test_config(deploy_delay_ms: u64) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("STORAGE_BACKEND", "memory".to_string()),
        ("BIND_ADDR", "127.0.0.1:0".to_string()),
        ("JWT_SECRET", "integration-test-secret".to_string()),
        ("DEPLOY_DELAY_MS", deploy_delay_ms.to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub async fn spawn_server() -> Result<TestServer, Box<dyn std::error::Error>> {
    spawn_server_with_delay(50).await
}

pub async fn spawn_server_with_delay(
    deploy_delay_ms: u64,
) -> Result<TestServer, Box<dyn std::error::Error>> {
    let config = test_config(deploy_delay_ms);
    let store: Arc<dyn Storage> = Arc::new(MemoryStore::new());
    seed_networks(store.as_ref()).await?;

    let router = create_router(AppState::new(store.clone(), Arc::new(OfflineRpc), &config));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client,
        store,
        handle,
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the status with the parsed envelope.
    pub async fn call(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await?;
        Ok((status, body))
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        self.call(reqwest::Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<(u16, Value), Box<dyn std::error::Error>> {
        self.call(reqwest::Method::POST, path, token, Some(body)).await
    }

    /// Registers `username` and returns a bearer token for it.
    pub async fn login_as(&self, username: &str) -> Result<String, Box<dyn std::error::Error>> {
        let password = "correct-horse-battery";
        let (status, body) = self
            .post(
                "/auth/register",
                None,
                json!({ "username": username, "password": password }),
            )
            .await?;
        assert_eq!(status, 201, "register failed: {body}");

        let (status, body) = self
            .post(
                "/auth/login",
                None,
                json!({ "username": username, "password": password }),
            )
            .await?;
        assert_eq!(status, 200, "login failed: {body}");
        Ok(body["data"]["token"]
            .as_str()
            .ok_or("login response had no token")?
            .to_string())
    }
}
