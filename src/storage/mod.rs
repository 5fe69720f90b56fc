//! Repository traits and their Postgres / in-memory backends.

pub mod memory;
pub mod postgres;
pub mod seed;

use crate::domain::model::{
    DeploymentTransaction, MemeCoin, MemeCoinStatus, Network, Payment, PaymentStatus, Token,
    TokenAnalytics, TokenContract, TokenFeatures, TokenStatus, Transaction, User, Wallet,
};
use crate::domain::validation::Page;
use crate::infra::config::{Config, StorageBackend};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the constraint or field name.
    #[error("duplicate value for {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Backend(#[from] sqlx::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filters for [`MemeCoinRepository::search_meme_coins`].
#[derive(Debug, Clone, Default)]
pub struct MemeCoinSearch {
    /// Case-insensitive substring of name, symbol or description.
    pub query: String,
    pub network: Option<String>,
    pub status: Option<MemeCoinStatus>,
    pub page: Page,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: &User) -> StoreResult<()>;
    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn update_user(&self, user: &User) -> StoreResult<()>;
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()>;
}

#[async_trait]
pub trait MemeCoinRepository: Send + Sync {
    async fn insert_meme_coin(&self, coin: &MemeCoin) -> StoreResult<()>;
    async fn meme_coin_by_id(&self, id: Uuid) -> StoreResult<Option<MemeCoin>>;
    /// Symbols are stored uppercase; the lookup ignores case.
    async fn meme_coin_by_symbol(&self, symbol: &str) -> StoreResult<Option<MemeCoin>>;
    async fn meme_coins_by_creator(&self, creator_id: Uuid) -> StoreResult<Vec<MemeCoin>>;
    async fn list_meme_coins(&self, page: Page) -> StoreResult<Vec<MemeCoin>>;
    async fn search_meme_coins(&self, search: &MemeCoinSearch) -> StoreResult<Vec<MemeCoin>>;
    async fn meme_coins_by_status(&self, status: MemeCoinStatus) -> StoreResult<Vec<MemeCoin>>;
    async fn meme_coins_by_network(&self, network: &str, page: Page) -> StoreResult<Vec<MemeCoin>>;
    /// Writes the editable profile fields (name, description, links) and
    /// `updated_at`. Status and deployment columns are never touched.
    async fn update_meme_coin_metadata(&self, coin: &MemeCoin) -> StoreResult<()>;
    /// Removes the coin with its contract, deployments and payments.
    async fn delete_meme_coin(&self, id: Uuid) -> StoreResult<bool>;
    /// Compare-and-set on the status column. `false` when the coin is
    /// missing or not currently in `from`.
    async fn transition_meme_coin(
        &self,
        id: Uuid,
        from: MemeCoinStatus,
        to: MemeCoinStatus,
    ) -> StoreResult<bool>;
    /// `deploying → deployed`, recording the address and hash in the same write.
    async fn complete_meme_coin_deployment(
        &self,
        id: Uuid,
        contract_address: &str,
        deployment_hash: &str,
        deployed_at: DateTime<Utc>,
    ) -> StoreResult<bool>;
    async fn insert_contract(&self, contract: &TokenContract) -> StoreResult<()>;
    async fn contract_for(&self, meme_coin_id: Uuid) -> StoreResult<Option<TokenContract>>;
    async fn insert_deployment(&self, deployment: &DeploymentTransaction) -> StoreResult<()>;
    async fn deployments_for(&self, meme_coin_id: Uuid) -> StoreResult<Vec<DeploymentTransaction>>;
}

#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Writes the token, its features and its analytics row atomically.
    async fn insert_token(
        &self,
        token: &Token,
        features: &TokenFeatures,
        analytics: &TokenAnalytics,
    ) -> StoreResult<()>;
    async fn token_by_id(&self, id: Uuid) -> StoreResult<Option<Token>>;
    async fn tokens_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Token>>;
    async fn token_by_contract_address(&self, address: &str) -> StoreResult<Option<Token>>;
    async fn list_tokens(&self, page: Page) -> StoreResult<Vec<Token>>;
    async fn tokens_by_status(&self, status: TokenStatus) -> StoreResult<Vec<Token>>;
    /// Writes the editable profile fields and `updated_at` only.
    async fn update_token_metadata(&self, token: &Token) -> StoreResult<()>;
    /// Drops features and analytics; transactions keep their row with the token link cleared.
    async fn delete_token(&self, id: Uuid) -> StoreResult<bool>;
    async fn transition_token(&self, id: Uuid, from: TokenStatus, to: TokenStatus)
        -> StoreResult<bool>;
    /// `draft → deploying`, pinning the target network and pending tx hash.
    async fn begin_token_deployment(
        &self,
        id: Uuid,
        network: &str,
        tx_hash: &str,
    ) -> StoreResult<bool>;
    /// `deploying → deployed` with the contract address and final tx hash.
    async fn complete_token_deployment(
        &self,
        id: Uuid,
        contract_address: &str,
        tx_hash: &str,
    ) -> StoreResult<bool>;
    async fn token_features(&self, token_id: Uuid) -> StoreResult<Option<TokenFeatures>>;
    async fn update_token_features(&self, features: &TokenFeatures) -> StoreResult<()>;
    async fn token_analytics(&self, token_id: Uuid) -> StoreResult<Option<TokenAnalytics>>;
    async fn update_token_analytics(&self, analytics: &TokenAnalytics) -> StoreResult<()>;
}

#[async_trait]
pub trait ChainRepository: Send + Sync {
    /// Inserts or refreshes a network keyed by chain id and returns the stored row.
    async fn upsert_network(&self, network: &Network) -> StoreResult<Network>;
    async fn network_by_id(&self, id: Uuid) -> StoreResult<Option<Network>>;
    async fn network_by_name(&self, name: &str) -> StoreResult<Option<Network>>;
    async fn network_by_chain_id(&self, chain_id: i64) -> StoreResult<Option<Network>>;
    async fn active_networks(&self) -> StoreResult<Vec<Network>>;

    async fn insert_wallet(&self, wallet: &Wallet) -> StoreResult<()>;
    async fn wallet_by_id(&self, id: Uuid) -> StoreResult<Option<Wallet>>;
    async fn wallets_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Wallet>>;
    async fn wallet_by_address(&self, address: &str) -> StoreResult<Option<Wallet>>;
    async fn delete_wallet(&self, id: Uuid) -> StoreResult<bool>;

    async fn insert_transaction(&self, tx: &Transaction) -> StoreResult<()>;
    async fn transaction_by_hash(&self, hash: &str) -> StoreResult<Option<Transaction>>;
    async fn transactions_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>>;
    async fn transactions_by_token(&self, token_id: Uuid) -> StoreResult<Vec<Transaction>>;
    async fn update_transaction(&self, tx: &Transaction) -> StoreResult<()>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert_payment(&self, payment: &Payment) -> StoreResult<()>;
    async fn payment_by_id(&self, id: Uuid) -> StoreResult<Option<Payment>>;
    async fn payments_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Payment>>;
    async fn payments_for_meme_coin(&self, meme_coin_id: Uuid) -> StoreResult<Vec<Payment>>;
    /// Writes status, hash and `paid_at` only if the stored status is still `from`.
    async fn transition_payment(&self, payment: &Payment, from: PaymentStatus) -> StoreResult<bool>;
}

/// Everything the services need from a backend.
#[async_trait]
pub trait Storage:
    UserRepository + MemeCoinRepository + TokenRepository + ChainRepository + PaymentRepository
{
    /// Cheap round-trip used by `/health`.
    async fn ping(&self) -> StoreResult<()>;

    fn backend_name(&self) -> &'static str;
}

/// Builds the configured backend. Postgres gets its schema ensured before use.
pub async fn open(config: &Config) -> anyhow::Result<Arc<dyn Storage>> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the postgres backend"))?;
            let store = PgStore::connect(url, config.db_max_connections)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to Postgres: {e}"))?;
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
    }
}
