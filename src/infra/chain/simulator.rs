use crate::crypto::address::{random_address, random_tx_hash};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub network: String,
    pub gas_limit: i64,
    /// Wei, decimal string.
    pub gas_price: String,
    /// Reuse a hash already handed out to the client; a fresh one is drawn otherwise.
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReceipt {
    pub contract_address: String,
    pub transaction_hash: String,
    pub block_number: i64,
    pub gas_used: i64,
    pub gas_price: String,
}

/// Stands in for a real broadcast: waits, then returns random but
/// well-formed chain artifacts.
#[derive(Debug, Clone)]
pub struct SimulatedDeployer {
    delay: Duration,
}

impl SimulatedDeployer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn deploy(&self, request: DeploymentRequest) -> anyhow::Result<DeploymentReceipt> {
        if request.gas_limit <= 0 {
            anyhow::bail!("gas limit must be positive, got {}", request.gas_limit);
        }
        if request.gas_price.is_empty() || !request.gas_price.chars().all(|c| c.is_ascii_digit()) {
            anyhow::bail!("gas price '{}' is not a wei amount", request.gas_price);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let (block_number, gas_used) = {
            let mut rng = rand::thread_rng();
            let floor = (request.gas_limit * 6 / 10).max(1);
            (
                rng.gen_range(18_000_000..19_000_000),
                rng.gen_range(floor..=request.gas_limit),
            )
        };
        let receipt = DeploymentReceipt {
            contract_address: random_address(),
            transaction_hash: request.transaction_hash.unwrap_or_else(random_tx_hash),
            block_number,
            gas_used,
            gas_price: request.gas_price,
        };
        tracing::info!(
            network = %request.network,
            tx = %receipt.transaction_hash,
            contract = %receipt.contract_address,
            "Simulated deployment confirmed"
        );
        Ok(receipt)
    }
}
