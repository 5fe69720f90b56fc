//! Networks, wallets and transaction lookups. Chain reads go through [`ChainRpc`].

use crate::app::error::{ServiceError, ServiceResult};
use crate::crypto::address::checksummed;
use crate::domain::model::{Network, Transaction, Wallet, WalletType};
use crate::domain::networks;
use crate::domain::validation::{self, ValidationError};
use crate::infra::chain::ChainRpc;
use crate::storage::seed::network_from_catalogue;
use crate::storage::Storage;
use chrono::Utc;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct NetworkDetails {
    #[serde(flatten)]
    pub network: Network,
    /// Meme coin deployment price in native currency, if the network accepts them.
    pub deployment_cost: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GasPrice {
    pub network: String,
    /// Wei, decimal string.
    pub gas_price: String,
    /// `rpc` when read from the node, `default` when it fell back.
    pub source: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Balance {
    pub network: String,
    pub address: String,
    /// Wei, decimal string.
    pub balance: String,
    pub currency: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConnectWalletRequest {
    pub address: String,
    #[serde(default = "default_wallet_type")]
    pub wallet_type: WalletType,
}

fn default_wallet_type() -> WalletType {
    WalletType::Metamask
}

pub struct ChainService {
    store: Arc<dyn Storage>,
    rpc: Arc<dyn ChainRpc>,
}

impl ChainService {
    pub fn new(store: Arc<dyn Storage>, rpc: Arc<dyn ChainRpc>) -> Self {
        Self { store, rpc }
    }

    pub async fn active_networks(&self) -> ServiceResult<Vec<Network>> {
        Ok(self.store.active_networks().await?)
    }

    /// Stored row when present, catalogue entry otherwise.
    async fn network(&self, name: &str) -> ServiceResult<Network> {
        let name = name.trim().to_ascii_lowercase();
        if let Some(network) = self.store.network_by_name(&name).await? {
            return Ok(network);
        }
        networks::lookup(&name)
            .map(network_from_catalogue)
            .ok_or_else(|| ServiceError::not_found(format!("network '{name}'")))
    }

    pub async fn network_info(&self, name: &str) -> ServiceResult<NetworkDetails> {
        let network = self.network(name).await?;
        let deployment_cost = networks::deployment_cost(&network.name);
        Ok(NetworkDetails {
            network,
            deployment_cost,
        })
    }

    pub async fn gas_price(&self, name: &str) -> ServiceResult<GasPrice> {
        let network = self.network(name).await?;
        match self.rpc.gas_price(&network.rpc_url).await {
            Ok(price) => Ok(GasPrice {
                network: network.name,
                gas_price: price.to_string(),
                source: "rpc".into(),
            }),
            Err(e) => {
                tracing::warn!(network = %network.name, error = %e, "Gas price lookup failed, using default");
                Ok(GasPrice {
                    network: network.name,
                    gas_price: network.gas_price,
                    source: "default".into(),
                })
            }
        }
    }

    pub async fn balance(&self, name: &str, address: &str) -> ServiceResult<Balance> {
        validation::wallet_address(address)?;
        let network = self.network(name).await?;
        let wei: U256 = self.rpc.balance(&network.rpc_url, address).await?;
        Ok(Balance {
            network: network.name,
            address: address.to_string(),
            balance: wei.to_string(),
            currency: network.currency,
        })
    }

    pub async fn connect_wallet(
        &self,
        user_id: Uuid,
        request: ConnectWalletRequest,
    ) -> ServiceResult<Wallet> {
        let raw = request.address.trim();
        validation::wallet_address(raw)?;
        let address = checksummed(raw)
            .ok_or_else(|| ValidationError::new("address", "not a valid address"))?;

        if self.store.wallet_by_address(&address).await?.is_some() {
            return Err(ServiceError::Conflict("wallet already connected".into()));
        }

        let now = Utc::now();
        let wallet = Wallet {
            id: Uuid::new_v4(),
            user_id,
            address,
            wallet_type: request.wallet_type,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_wallet(&wallet).await?;
        tracing::info!(user_id = %user_id, address = %wallet.address, "Wallet connected");
        Ok(wallet)
    }

    pub async fn wallets(&self, user_id: Uuid) -> ServiceResult<Vec<Wallet>> {
        Ok(self.store.wallets_by_user(user_id).await?)
    }

    pub async fn disconnect_wallet(&self, user_id: Uuid, wallet_id: Uuid) -> ServiceResult<()> {
        let wallet = self
            .store
            .wallet_by_id(wallet_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("wallet"))?;
        if wallet.user_id != user_id {
            return Err(ServiceError::forbidden("wallet belongs to another user"));
        }
        self.store.delete_wallet(wallet_id).await?;
        tracing::info!(user_id = %user_id, wallet_id = %wallet_id, "Wallet disconnected");
        Ok(())
    }

    pub async fn transaction_by_hash(&self, hash: &str) -> ServiceResult<Transaction> {
        validation::transaction_hash(hash)?;
        self.store
            .transaction_by_hash(hash)
            .await?
            .ok_or_else(|| ServiceError::not_found("transaction"))
    }

    pub async fn transactions_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Transaction>> {
        Ok(self.store.transactions_by_user(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::address::random_address;
    use crate::infra::chain::RpcError;
    use crate::storage::seed::seed_networks;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;

    /// Answers every call from fixed values, or fails when `up` is false.
    struct FakeRpc {
        up: bool,
    }

    #[async_trait]
    impl ChainRpc for FakeRpc {
        async fn gas_price(&self, _rpc_url: &str) -> Result<U256, RpcError> {
            if self.up {
                Ok(U256::from(7_000_000_000u64))
            } else {
                Err(RpcError::Remote {
                    method: "eth_gasPrice",
                    code: -32000,
                    message: "down".into(),
                })
            }
        }

        async fn balance(&self, _rpc_url: &str, _address: &str) -> Result<U256, RpcError> {
            if self.up {
                Ok(U256::exp10(18))
            } else {
                Err(RpcError::Remote {
                    method: "eth_getBalance",
                    code: -32000,
                    message: "down".into(),
                })
            }
        }

        async fn chain_id(&self, _rpc_url: &str) -> Result<u64, RpcError> {
            Ok(1)
        }
    }

    async fn service(up: bool) -> ChainService {
        let store = Arc::new(MemoryStore::new());
        seed_networks(store.as_ref()).await.unwrap();
        ChainService::new(store, Arc::new(FakeRpc { up }))
    }

    #[tokio::test]
    async fn gas_price_falls_back_to_the_stored_default() {
        let live = service(true).await.gas_price("ethereum").await.unwrap();
        assert_eq!(live.gas_price, "7000000000");
        assert_eq!(live.source, "rpc");

        let fallback = service(false).await.gas_price("ethereum").await.unwrap();
        assert_eq!(fallback.source, "default");
        assert_eq!(
            fallback.gas_price,
            networks::lookup("ethereum").unwrap().gas_price_wei.to_string()
        );
    }

    #[tokio::test]
    async fn balance_validates_and_surfaces_rpc_failures() {
        let err = service(true)
            .await
            .balance("ethereum", "0x1234")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let address = random_address();
        let ok = service(true).await.balance("ethereum", &address).await.unwrap();
        assert_eq!(ok.balance, "1000000000000000000");
        assert_eq!(ok.currency, "ETH");

        let err = service(false)
            .await
            .balance("ethereum", &address)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Chain(_)));
    }

    #[tokio::test]
    async fn network_info_includes_deployment_cost() {
        let svc = service(true).await;
        let info = svc.network_info("BSC").await.unwrap();
        assert_eq!(info.network.name, "bsc");
        assert!(info.deployment_cost.is_some());
        assert!(matches!(
            svc.network_info("dogechain").await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn wallets_are_unique_and_owned() {
        let svc = service(true).await;
        let owner = Uuid::new_v4();
        let address = random_address();
        let wallet = svc
            .connect_wallet(
                owner,
                ConnectWalletRequest {
                    address: address.to_lowercase(),
                    wallet_type: WalletType::Metamask,
                },
            )
            .await
            .unwrap();
        assert_eq!(wallet.address, address);

        let err = svc
            .connect_wallet(
                Uuid::new_v4(),
                ConnectWalletRequest {
                    address: address.clone(),
                    wallet_type: WalletType::WalletConnect,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        assert!(matches!(
            svc.disconnect_wallet(Uuid::new_v4(), wallet.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        svc.disconnect_wallet(owner, wallet.id).await.unwrap();
        assert!(svc.wallets(owner).await.unwrap().is_empty());
    }
}
