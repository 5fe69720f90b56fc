//! Token lifecycle. Deployment is asynchronous: the request returns a pending
//! transaction and a spawned task settles it after the simulated delay.

use crate::app::error::{ServiceError, ServiceResult};
use crate::crypto::address::random_tx_hash;
use crate::domain::contract::{generate_token_contract, GeneratedContract};
use crate::domain::model::{
    MemeCoinStatus, Token, TokenAnalytics, TokenFeatures, TokenStatus, Transaction,
    TransactionStatus, TransactionType,
};
use crate::domain::networks::DEFAULT_GAS_LIMIT;
use crate::domain::validation::{self, Page, ValidationError};
use crate::infra::chain::{DeploymentRequest, SimulatedDeployer};
use crate::storage::Storage;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

fn default_decimals() -> u8 {
    18
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTokenRequest {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    pub total_supply: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    pub network: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub features: TokenFeatures,
}

/// Absent or blank fields keep their current value; `features` replaces the stored set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTokenRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub features: Option<TokenFeatures>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeployTokenRequest {
    pub token_id: Uuid,
    pub network_id: Uuid,
}

/// Counts of records moved to `failed` by [`TokenService::recover_interrupted`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    pub tokens: usize,
    pub meme_coins: usize,
    pub transactions: usize,
}

fn patch(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_url(field: &str, value: &Option<String>) -> Result<(), ValidationError> {
    validation::optional_url(field, value.as_deref())
}

fn check_features(features: &TokenFeatures) -> Result<(), ValidationError> {
    validation::tax_percentage("buy_tax_percentage", features.buy_tax_percentage)?;
    validation::tax_percentage("sell_tax_percentage", features.sell_tax_percentage)?;
    for (field, amount) in [
        ("max_tx_amount", &features.max_tx_amount),
        ("max_wallet_amount", &features.max_wallet_amount),
    ] {
        if let Some(amount) = amount {
            if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit()) {
                return Err(ValidationError::new(field, "must be a non-negative integer"));
            }
        }
    }
    Ok(())
}

pub struct TokenService {
    store: Arc<dyn Storage>,
    deployer: Arc<SimulatedDeployer>,
}

impl TokenService {
    pub fn new(store: Arc<dyn Storage>, deployer: Arc<SimulatedDeployer>) -> Self {
        Self { store, deployer }
    }

    pub async fn create(&self, user_id: Uuid, request: CreateTokenRequest) -> ServiceResult<Token> {
        let name = request.name.trim().to_string();
        validation::length("name", &name, 1, 100)?;
        let symbol = request.symbol.trim().to_string();
        validation::token_symbol(&symbol)?;
        let description = request.description.trim().to_string();
        validation::max_length("description", &description, 1000)?;
        let total_supply = request.total_supply.trim().to_string();
        validation::total_supply(&total_supply, request.decimals)?;
        let network = request.network.trim().to_ascii_lowercase();
        validation::length("network", &network, 1, 50)?;

        let image_url = patch(request.image_url);
        let website = patch(request.website);
        let twitter = patch(request.twitter);
        let telegram = patch(request.telegram);
        let discord = patch(request.discord);
        check_url("image_url", &image_url)?;
        check_url("website", &website)?;
        check_url("twitter", &twitter)?;
        check_url("telegram", &telegram)?;
        check_url("discord", &discord)?;
        check_features(&request.features)?;

        let now = Utc::now();
        let token = Token {
            id: Uuid::new_v4(),
            user_id,
            name,
            symbol,
            description,
            total_supply,
            decimals: request.decimals,
            contract_address: None,
            network,
            image_url,
            website,
            twitter,
            telegram,
            discord,
            status: TokenStatus::Draft,
            deployment_tx_hash: None,
            created_at: now,
            updated_at: now,
        };
        let features = TokenFeatures {
            token_id: token.id,
            ..request.features
        };
        self.store
            .insert_token(&token, &features, &TokenAnalytics::empty(token.id))
            .await?;

        tracing::info!(token_id = %token.id, symbol = %token.symbol, "Token created");
        Ok(token)
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<Token> {
        self.store
            .token_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("token"))
    }

    pub async fn get_by_contract_address(&self, address: &str) -> ServiceResult<Token> {
        validation::wallet_address(address)?;
        self.store
            .token_by_contract_address(address)
            .await?
            .ok_or_else(|| ServiceError::not_found("token"))
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> ServiceResult<Vec<Token>> {
        Ok(self.store.tokens_by_user(user_id).await?)
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Vec<Token>> {
        Ok(self.store.list_tokens(page).await?)
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> ServiceResult<Token> {
        let token = self.get(id).await?;
        if token.user_id != user_id {
            return Err(ServiceError::forbidden("only the owner can modify this token"));
        }
        Ok(token)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateTokenRequest,
    ) -> ServiceResult<Token> {
        let mut token = self.owned(user_id, id).await?;

        if let Some(name) = patch(request.name) {
            validation::length("name", &name, 1, 100)?;
            token.name = name;
        }
        if let Some(description) = patch(request.description) {
            validation::max_length("description", &description, 1000)?;
            token.description = description;
        }
        for (field, value, slot) in [
            ("image_url", request.image_url, &mut token.image_url),
            ("website", request.website, &mut token.website),
            ("twitter", request.twitter, &mut token.twitter),
            ("telegram", request.telegram, &mut token.telegram),
            ("discord", request.discord, &mut token.discord),
        ] {
            if let Some(url) = patch(value) {
                validation::optional_url(field, Some(url.as_str()))?;
                *slot = Some(url);
            }
        }

        if let Some(features) = request.features {
            if token.status != TokenStatus::Draft {
                return Err(ServiceError::InvalidState(
                    "features can only change while the token is a draft".into(),
                ));
            }
            check_features(&features)?;
            self.store
                .update_token_features(&TokenFeatures {
                    token_id: token.id,
                    ..features
                })
                .await?;
        }

        token.updated_at = Utc::now();
        self.store.update_token_metadata(&token).await?;
        self.get(id).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> ServiceResult<()> {
        let token = self.owned(user_id, id).await?;
        if token.status != TokenStatus::Draft {
            return Err(ServiceError::InvalidState(format!(
                "only draft tokens can be deleted (currently {})",
                token.status
            )));
        }
        self.store.delete_token(id).await?;
        tracing::info!(token_id = %id, "Token deleted");
        Ok(())
    }

    /// Starts a deployment and returns the pending transaction immediately.
    pub async fn deploy(&self, user_id: Uuid, request: DeployTokenRequest) -> ServiceResult<Transaction> {
        let token = self.owned(user_id, request.token_id).await?;
        if token.status != TokenStatus::Draft {
            return Err(ServiceError::InvalidState(format!(
                "token must be a draft to deploy (currently {})",
                token.status
            )));
        }
        let network = self
            .store
            .network_by_id(request.network_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("network"))?;
        if !network.is_active {
            return Err(ValidationError::new("network_id", "network is not active").into());
        }

        let hash = random_tx_hash();
        if !self
            .store
            .begin_token_deployment(token.id, &network.name, &hash)
            .await?
        {
            return Err(ServiceError::InvalidState(
                "token deployment already in progress".into(),
            ));
        }

        let now = Utc::now();
        let tx = Transaction {
            id: Uuid::new_v4(),
            token_id: Some(token.id),
            user_id,
            hash,
            tx_type: TransactionType::Deploy,
            status: TransactionStatus::Pending,
            gas_used: None,
            gas_price: Some(network.gas_price.clone()),
            block_number: None,
            network_id: network.id,
            created_at: now,
            updated_at: now,
        };
        if let Err(e) = self.store.insert_transaction(&tx).await {
            tracing::warn!(token_id = %token.id, error = %e, "Could not record deployment, back to draft");
            self.store
                .transition_token(token.id, TokenStatus::Deploying, TokenStatus::Draft)
                .await?;
            return Err(e.into());
        }

        tracing::info!(
            token_id = %token.id,
            network = %network.name,
            tx = %tx.hash,
            delay_ms = self.deployer.delay().as_millis() as u64,
            "Token deployment started"
        );

        let store = self.store.clone();
        let deployer = self.deployer.clone();
        let pending = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = complete_deployment(store, deployer, pending).await {
                tracing::error!(error = %e, "Token deployment bookkeeping failed");
            }
        });

        Ok(tx)
    }

    pub async fn features(&self, token_id: Uuid) -> ServiceResult<TokenFeatures> {
        self.get(token_id).await?;
        self.store
            .token_features(token_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("token features"))
    }

    pub async fn analytics(&self, token_id: Uuid) -> ServiceResult<TokenAnalytics> {
        self.get(token_id).await?;
        self.store
            .token_analytics(token_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("token analytics"))
    }

    pub async fn contract_code(&self, token_id: Uuid) -> ServiceResult<GeneratedContract> {
        let token = self.get(token_id).await?;
        let features = self.store.token_features(token_id).await?.unwrap_or_default();
        Ok(generate_token_contract(&token, &features))
    }

    pub async fn transactions(&self, token_id: Uuid) -> ServiceResult<Vec<Transaction>> {
        self.get(token_id).await?;
        Ok(self.store.transactions_by_token(token_id).await?)
    }

    /// Marks work left in `deploying` by a previous process as failed.
    pub async fn recover_interrupted(&self) -> ServiceResult<RecoveryReport> {
        let mut report = RecoveryReport::default();

        for token in self.store.tokens_by_status(TokenStatus::Deploying).await? {
            if self
                .store
                .transition_token(token.id, TokenStatus::Deploying, TokenStatus::Failed)
                .await?
            {
                report.tokens += 1;
            }
            for mut tx in self.store.transactions_by_token(token.id).await? {
                if tx.status == TransactionStatus::Pending {
                    tx.status = TransactionStatus::Failed;
                    tx.updated_at = Utc::now();
                    self.store.update_transaction(&tx).await?;
                    report.transactions += 1;
                }
            }
        }

        for coin in self.store.meme_coins_by_status(MemeCoinStatus::Deploying).await? {
            if self
                .store
                .transition_meme_coin(coin.id, MemeCoinStatus::Deploying, MemeCoinStatus::Failed)
                .await?
            {
                report.meme_coins += 1;
            }
        }

        if report != RecoveryReport::default() {
            tracing::warn!(
                tokens = report.tokens,
                meme_coins = report.meme_coins,
                transactions = report.transactions,
                "Marked interrupted deployments as failed"
            );
        }
        Ok(report)
    }
}

async fn complete_deployment(
    store: Arc<dyn Storage>,
    deployer: Arc<SimulatedDeployer>,
    mut tx: Transaction,
) -> ServiceResult<()> {
    let Some(token_id) = tx.token_id else {
        return Ok(());
    };
    let outcome = deployer
        .deploy(DeploymentRequest {
            network: tx.network_id.to_string(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: tx.gas_price.clone().unwrap_or_default(),
            transaction_hash: Some(tx.hash.clone()),
        })
        .await;

    let receipt = match outcome {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(token_id = %token_id, error = %e, "Token deployment failed");
            store
                .transition_token(token_id, TokenStatus::Deploying, TokenStatus::Failed)
                .await?;
            tx.status = TransactionStatus::Failed;
            tx.updated_at = Utc::now();
            store.update_transaction(&tx).await?;
            return Ok(());
        }
    };

    if !store
        .complete_token_deployment(token_id, &receipt.contract_address, &receipt.transaction_hash)
        .await?
    {
        tracing::warn!(token_id = %token_id, "Token left deploying before the receipt arrived");
        tx.status = TransactionStatus::Failed;
        tx.updated_at = Utc::now();
        store.update_transaction(&tx).await?;
        return Ok(());
    }

    let now = Utc::now();
    tx.status = TransactionStatus::Confirmed;
    tx.block_number = Some(receipt.block_number);
    tx.gas_used = Some(receipt.gas_used);
    tx.updated_at = now;
    store.update_transaction(&tx).await?;

    if let Some(mut analytics) = store.token_analytics(token_id).await? {
        analytics.transactions += 1;
        analytics.updated_at = now;
        store.update_token_analytics(&analytics).await?;
    }

    tracing::info!(token_id = %token_id, contract = %receipt.contract_address, "Token deployed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::seed::seed_networks;
    use crate::storage::{ChainRepository, MemoryStore, TokenRepository};
    use std::time::Duration;

    async fn setup() -> (TokenService, Arc<MemoryStore>, Uuid) {
        let store = Arc::new(MemoryStore::new());
        seed_networks(store.as_ref()).await.unwrap();
        let bsc = store.network_by_name("bsc").await.unwrap().unwrap();
        let svc = TokenService::new(
            store.clone(),
            Arc::new(SimulatedDeployer::new(Duration::from_millis(20))),
        );
        (svc, store, bsc.id)
    }

    fn request() -> CreateTokenRequest {
        CreateTokenRequest {
            name: "Pepe".into(),
            symbol: "PEPE".into(),
            description: String::new(),
            total_supply: "420000000".into(),
            decimals: 18,
            network: "bsc".into(),
            image_url: None,
            website: None,
            twitter: None,
            telegram: None,
            discord: None,
            features: TokenFeatures {
                is_mintable: true,
                ..TokenFeatures::default()
            },
        }
    }

    async fn wait_for_status(svc: &TokenService, id: Uuid, status: TokenStatus) -> Token {
        for _ in 0..100 {
            let token = svc.get(id).await.unwrap();
            if token.status == status {
                return token;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("token never reached {status}");
    }

    #[tokio::test]
    async fn create_stores_features_and_zeroed_analytics() {
        let (svc, _, _) = setup().await;
        let token = svc.create(Uuid::new_v4(), request()).await.unwrap();
        assert_eq!(token.status, TokenStatus::Draft);
        assert!(svc.features(token.id).await.unwrap().is_mintable);
        assert_eq!(svc.analytics(token.id).await.unwrap().holders, 0);
        assert!(svc
            .contract_code(token.id)
            .await
            .unwrap()
            .contract_code
            .contains("function mint("));
    }

    #[tokio::test]
    async fn excessive_tax_is_rejected() {
        let (svc, _, _) = setup().await;
        let mut req = request();
        req.features.buy_tax_percentage = 30;
        assert!(matches!(
            svc.create(Uuid::new_v4(), req).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn deploy_completes_in_the_background() {
        let (svc, _, network_id) = setup().await;
        let owner = Uuid::new_v4();
        let token = svc.create(owner, request()).await.unwrap();

        let tx = svc
            .deploy(owner, DeployTokenRequest { token_id: token.id, network_id })
            .await
            .unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(svc.get(token.id).await.unwrap().status, TokenStatus::Deploying);

        let deployed = wait_for_status(&svc, token.id, TokenStatus::Deployed).await;
        assert!(deployed.contract_address.is_some());
        assert_eq!(deployed.deployment_tx_hash.as_deref(), Some(tx.hash.as_str()));

        let txs = svc.transactions(token.id).await.unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].status, TransactionStatus::Confirmed);
        assert!(txs[0].block_number.is_some());
        assert_eq!(svc.analytics(token.id).await.unwrap().transactions, 1);
    }

    #[tokio::test]
    async fn second_deploy_is_rejected() {
        let (svc, _, network_id) = setup().await;
        let owner = Uuid::new_v4();
        let token = svc.create(owner, request()).await.unwrap();
        svc.deploy(owner, DeployTokenRequest { token_id: token.id, network_id })
            .await
            .unwrap();
        let err = svc
            .deploy(owner, DeployTokenRequest { token_id: token.id, network_id })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_network_and_stranger_are_rejected() {
        let (svc, _, network_id) = setup().await;
        let owner = Uuid::new_v4();
        let token = svc.create(owner, request()).await.unwrap();
        assert!(matches!(
            svc.deploy(owner, DeployTokenRequest { token_id: token.id, network_id: Uuid::new_v4() })
                .await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.deploy(Uuid::new_v4(), DeployTokenRequest { token_id: token.id, network_id })
                .await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn recovery_fails_stuck_deployments() {
        let (svc, store, _) = setup().await;
        let token = svc.create(Uuid::new_v4(), request()).await.unwrap();
        store
            .transition_token(token.id, TokenStatus::Draft, TokenStatus::Deploying)
            .await
            .unwrap();

        let report = svc.recover_interrupted().await.unwrap();
        assert_eq!(report.tokens, 1);
        assert_eq!(svc.get(token.id).await.unwrap().status, TokenStatus::Failed);
        assert_eq!(svc.recover_interrupted().await.unwrap(), RecoveryReport::default());
    }

    #[tokio::test]
    async fn only_drafts_can_be_deleted() {
        let (svc, _, network_id) = setup().await;
        let owner = Uuid::new_v4();
        let draft = svc.create(owner, request()).await.unwrap();
        let live = svc.create(owner, request()).await.unwrap();
        svc.deploy(owner, DeployTokenRequest { token_id: live.id, network_id })
            .await
            .unwrap();

        svc.delete(owner, draft.id).await.unwrap();
        assert!(matches!(svc.get(draft.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.delete(owner, live.id).await,
            Err(ServiceError::InvalidState(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn profile_edits_racing_a_deployment_keep_the_receipt() {
        let (svc, _, network_id) = setup().await;
        let svc = Arc::new(svc);
        let owner = Uuid::new_v4();
        let token_id = svc.create(owner, request()).await.unwrap().id;
        svc.deploy(owner, DeployTokenRequest { token_id, network_id })
            .await
            .unwrap();

        let editors: Vec<_> = (0..8)
            .map(|editor| {
                let svc = svc.clone();
                tokio::spawn(async move {
                    for round in 0..20 {
                        svc.update(
                            owner,
                            token_id,
                            UpdateTokenRequest {
                                description: Some(format!("edit {editor}-{round}")),
                                ..Default::default()
                            },
                        )
                        .await
                        .unwrap();
                        tokio::time::sleep(Duration::from_millis(2)).await;
                    }
                })
            })
            .collect();
        for editor in editors {
            editor.await.unwrap();
        }

        let deployed = wait_for_status(&svc, token_id, TokenStatus::Deployed).await;
        assert!(deployed.contract_address.is_some());
        assert!(deployed.description.starts_with("edit "));
        let txs = svc.transactions(token_id).await.unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].status, TransactionStatus::Confirmed);
        assert_eq!(deployed.deployment_tx_hash.as_deref(), Some(txs[0].hash.as_str()));
    }

    #[tokio::test]
    async fn unrecorded_deployment_returns_token_to_draft() {
        let (svc, store, network_id) = setup().await;
        let owner = Uuid::new_v4();
        let token = svc.create(owner, request()).await.unwrap();

        store.fail_on("insert_transaction");
        assert!(matches!(
            svc.deploy(owner, DeployTokenRequest { token_id: token.id, network_id })
                .await,
            Err(ServiceError::Store(_))
        ));
        assert_eq!(svc.get(token.id).await.unwrap().status, TokenStatus::Draft);
        assert!(svc.transactions(token.id).await.unwrap().is_empty());
        assert!(store.tokens_by_status(TokenStatus::Deploying).await.unwrap().is_empty());
    }
}
