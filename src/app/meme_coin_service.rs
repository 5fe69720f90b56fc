//! Meme coin lifecycle: create, browse, edit and the synchronous simulated deployment.

use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::contract::generate_meme_coin_contract;
use crate::domain::model::{
    DeploymentTransaction, MemeCoin, MemeCoinStatus, PaymentStatus, TokenContract,
    TransactionStatus,
};
use crate::domain::networks::{self, DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI};
use crate::domain::validation::{self, Page, ValidationError};
use crate::infra::chain::{DeploymentRequest, SimulatedDeployer};
use crate::storage::{MemeCoinSearch, Storage};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

fn default_decimals() -> u8 {
    18
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMemeCoinRequest {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
    /// Whole tokens, decimal integer string.
    pub total_supply: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
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
    pub network: String,
}

/// Absent or blank fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMemeCoinRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
}

impl UpdateMemeCoinRequest {
    fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.description,
            &self.image_url,
            &self.website,
            &self.twitter,
            &self.telegram,
            &self.discord,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |v| v.trim().is_empty()))
    }
}

fn patch(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn social_handle(value: Option<String>, field: &str) -> Result<Option<String>, ValidationError> {
    match patch(value) {
        Some(v) => {
            validation::max_length(field, &v, 100)?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

pub struct MemeCoinService {
    store: Arc<dyn Storage>,
    deployer: Arc<SimulatedDeployer>,
}

impl MemeCoinService {
    pub fn new(store: Arc<dyn Storage>, deployer: Arc<SimulatedDeployer>) -> Self {
        Self { store, deployer }
    }

    pub fn deployment_cost(&self, network: &str) -> ServiceResult<f64> {
        networks::deployment_cost(network)
            .ok_or_else(|| ValidationError::new("network", "unsupported network").into())
    }

    pub async fn create(
        &self,
        creator_id: Uuid,
        request: CreateMemeCoinRequest,
    ) -> ServiceResult<MemeCoin> {
        let name = request.name.trim().to_string();
        validation::length("name", &name, 1, 50)?;
        let symbol = validation::meme_coin_symbol(&request.symbol)?;
        let description = request.description.trim().to_string();
        validation::max_length("description", &description, 500)?;
        validation::decimals(request.decimals)?;
        let total_supply = request.total_supply.trim().to_string();
        validation::total_supply(&total_supply, request.decimals)?;
        let image_url = patch(request.image_url);
        validation::optional_url("image_url", image_url.as_deref())?;
        let website = patch(request.website);
        validation::optional_url("website", website.as_deref())?;
        let twitter = social_handle(request.twitter, "twitter")?;
        let telegram = social_handle(request.telegram, "telegram")?;
        let discord = social_handle(request.discord, "discord")?;
        let network = request.network.trim().to_ascii_lowercase();
        validation::meme_coin_network(&network)?;
        let price = self.deployment_cost(&network)?;

        if self.store.meme_coin_by_symbol(&symbol).await?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "meme coin with symbol {symbol} already exists"
            )));
        }

        let now = Utc::now();
        let coin = MemeCoin {
            id: Uuid::new_v4(),
            name,
            symbol,
            description,
            total_supply,
            decimals: request.decimals,
            image_url,
            website,
            twitter,
            telegram,
            discord,
            contract_address: None,
            network,
            status: MemeCoinStatus::Pending,
            deployment_hash: None,
            deployed_at: None,
            creator_id,
            price,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_meme_coin(&coin).await?;

        let generated = generate_meme_coin_contract(&coin);
        let contract = TokenContract {
            id: Uuid::new_v4(),
            meme_coin_id: coin.id,
            contract_code: generated.contract_code,
            abi: generated.abi.to_string(),
            bytecode: generated.bytecode,
            constructor_args: generated.constructor_args.to_string(),
            network: coin.network.clone(),
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE_WEI.to_string(),
            created_at: now,
        };
        self.store.insert_contract(&contract).await?;

        tracing::info!(meme_coin_id = %coin.id, symbol = %coin.symbol, network = %coin.network, "Meme coin created");
        Ok(coin)
    }

    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<MemeCoin> {
        self.store
            .meme_coin_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("meme coin"))
    }

    pub async fn get_by_symbol(&self, symbol: &str) -> ServiceResult<MemeCoin> {
        self.store
            .meme_coin_by_symbol(symbol.trim())
            .await?
            .ok_or_else(|| ServiceError::not_found("meme coin"))
    }

    pub async fn list_by_creator(&self, creator_id: Uuid) -> ServiceResult<Vec<MemeCoin>> {
        Ok(self.store.meme_coins_by_creator(creator_id).await?)
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Vec<MemeCoin>> {
        Ok(self.store.list_meme_coins(page).await?)
    }

    pub async fn list_by_network(&self, network: &str, page: Page) -> ServiceResult<Vec<MemeCoin>> {
        Ok(self.store.meme_coins_by_network(network, page).await?)
    }

    pub async fn search(&self, search: MemeCoinSearch) -> ServiceResult<Vec<MemeCoin>> {
        validation::max_length("q", &search.query, 100)?;
        Ok(self.store.search_meme_coins(&search).await?)
    }

    async fn owned(&self, user_id: Uuid, id: Uuid) -> ServiceResult<MemeCoin> {
        let coin = self.get_by_id(id).await?;
        if coin.creator_id != user_id {
            return Err(ServiceError::forbidden("only the creator can modify this meme coin"));
        }
        Ok(coin)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        request: UpdateMemeCoinRequest,
    ) -> ServiceResult<MemeCoin> {
        let mut coin = self.owned(user_id, id).await?;
        if request.is_empty() {
            return Ok(coin);
        }

        if let Some(name) = patch(request.name) {
            validation::length("name", &name, 1, 50)?;
            coin.name = name;
        }
        if let Some(description) = patch(request.description) {
            validation::max_length("description", &description, 500)?;
            coin.description = description;
        }
        if let Some(image_url) = patch(request.image_url) {
            validation::optional_url("image_url", Some(image_url.as_str()))?;
            coin.image_url = Some(image_url);
        }
        if let Some(website) = patch(request.website) {
            validation::optional_url("website", Some(website.as_str()))?;
            coin.website = Some(website);
        }
        if let Some(twitter) = social_handle(request.twitter, "twitter")? {
            coin.twitter = Some(twitter);
        }
        if let Some(telegram) = social_handle(request.telegram, "telegram")? {
            coin.telegram = Some(telegram);
        }
        if let Some(discord) = social_handle(request.discord, "discord")? {
            coin.discord = Some(discord);
        }
        coin.updated_at = Utc::now();
        self.store.update_meme_coin_metadata(&coin).await?;
        self.get_by_id(id).await
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> ServiceResult<()> {
        let coin = self.owned(user_id, id).await?;
        if coin.status == MemeCoinStatus::Deployed {
            return Err(ValidationError::new("status", "deployed meme coins cannot be deleted").into());
        }
        if coin.status == MemeCoinStatus::Deploying {
            return Err(ServiceError::InvalidState(
                "meme coin is being deployed".into(),
            ));
        }
        let settled = self
            .store
            .payments_for_meme_coin(id)
            .await?
            .into_iter()
            .any(|p| matches!(p.status, PaymentStatus::Completed | PaymentStatus::Refunded));
        if settled {
            return Err(ServiceError::InvalidState(
                "meme coin has settled payments and cannot be deleted".into(),
            ));
        }
        self.store.delete_meme_coin(id).await?;
        tracing::info!(meme_coin_id = %id, "Meme coin deleted");
        Ok(())
    }

    pub async fn deploy(&self, user_id: Uuid, id: Uuid) -> ServiceResult<DeploymentTransaction> {
        let coin = self.owned(user_id, id).await?;
        if !self
            .store
            .transition_meme_coin(id, MemeCoinStatus::Pending, MemeCoinStatus::Deploying)
            .await?
        {
            let current = self.get_by_id(id).await?;
            return Err(ServiceError::InvalidState(format!(
                "meme coin must be pending to deploy (currently {})",
                current.status
            )));
        }

        match self.run_deployment(&coin).await {
            Ok(deployment) => Ok(deployment),
            Err(e) => {
                tracing::warn!(meme_coin_id = %id, error = %e, "Meme coin deployment failed");
                self.store
                    .transition_meme_coin(id, MemeCoinStatus::Deploying, MemeCoinStatus::Failed)
                    .await?;
                Err(e)
            }
        }
    }

    /// Everything after `pending → deploying`. Any error leaves the coin for the caller to fail.
    async fn run_deployment(&self, coin: &MemeCoin) -> ServiceResult<DeploymentTransaction> {
        let contract = self.store.contract_for(coin.id).await?;
        let (gas_limit, gas_price) = contract
            .map(|c| (c.gas_limit, c.gas_price))
            .unwrap_or((DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE_WEI.to_string()));

        let receipt = self
            .deployer
            .deploy(DeploymentRequest {
                network: coin.network.clone(),
                gas_limit,
                gas_price,
                transaction_hash: None,
            })
            .await
            .map_err(|e| ServiceError::Chain(e.to_string()))?;

        let now = Utc::now();
        let deployment = DeploymentTransaction {
            id: Uuid::new_v4(),
            meme_coin_id: coin.id,
            transaction_hash: receipt.transaction_hash.clone(),
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            gas_price: receipt.gas_price,
            status: TransactionStatus::Confirmed,
            deployed_at: now,
            network: coin.network.clone(),
            created_at: now,
        };
        self.store.insert_deployment(&deployment).await?;

        if !self
            .store
            .complete_meme_coin_deployment(
                coin.id,
                &receipt.contract_address,
                &receipt.transaction_hash,
                now,
            )
            .await?
        {
            return Err(ServiceError::InvalidState(
                "meme coin left deploying before the receipt was recorded".into(),
            ));
        }

        tracing::info!(
            meme_coin_id = %coin.id,
            contract = %receipt.contract_address,
            tx = %deployment.transaction_hash,
            "Meme coin deployed"
        );
        Ok(deployment)
    }

    pub async fn contract(&self, id: Uuid) -> ServiceResult<TokenContract> {
        self.get_by_id(id).await?;
        self.store
            .contract_for(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("contract"))
    }

    pub async fn deployments(&self, id: Uuid) -> ServiceResult<Vec<DeploymentTransaction>> {
        self.get_by_id(id).await?;
        Ok(self.store.deployments_for(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Payment;
    use crate::storage::{MemeCoinRepository, MemoryStore, PaymentRepository};

    fn service() -> MemeCoinService {
        MemeCoinService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SimulatedDeployer::instant()),
        )
    }

    fn request(symbol: &str) -> CreateMemeCoinRequest {
        CreateMemeCoinRequest {
            name: "Doge Moon".into(),
            symbol: symbol.into(),
            description: "much wow".into(),
            total_supply: "1000000".into(),
            decimals: 18,
            image_url: None,
            website: Some("https://doge.example".into()),
            twitter: None,
            telegram: None,
            discord: None,
            network: "ethereum".into(),
        }
    }

    #[tokio::test]
    async fn create_uppercases_symbol_and_prices_by_network() {
        let svc = service();
        let coin = svc.create(Uuid::new_v4(), request("dgm")).await.unwrap();
        assert_eq!(coin.symbol, "DGM");
        assert_eq!(coin.price, 0.05);
        assert_eq!(coin.status, MemeCoinStatus::Pending);

        let contract = svc.contract(coin.id).await.unwrap();
        assert!(contract.contract_code.contains("contract DogeMoon"));
        assert_eq!(contract.gas_limit, 500_000);
        assert_eq!(contract.gas_price, "20000000000");
    }

    #[tokio::test]
    async fn duplicate_symbol_conflicts_case_insensitively() {
        let svc = service();
        svc.create(Uuid::new_v4(), request("DGM")).await.unwrap();
        let err = svc.create(Uuid::new_v4(), request("dgm")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn unsupported_network_is_a_validation_error() {
        let svc = service();
        let mut req = request("DGM");
        req.network = "goerli".into();
        assert!(matches!(
            svc.create(Uuid::new_v4(), req).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn deploy_transitions_once_and_records_transaction() {
        let svc = service();
        let creator = Uuid::new_v4();
        let coin = svc.create(creator, request("DGM")).await.unwrap();

        let deployment = svc.deploy(creator, coin.id).await.unwrap();
        assert_eq!(deployment.status, TransactionStatus::Confirmed);

        let deployed = svc.get_by_id(coin.id).await.unwrap();
        assert_eq!(deployed.status, MemeCoinStatus::Deployed);
        assert_eq!(deployed.deployment_hash.as_deref(), Some(deployment.transaction_hash.as_str()));
        assert!(deployed.deployed_at.is_some());
        assert_eq!(svc.deployments(coin.id).await.unwrap().len(), 1);

        let again = svc.deploy(creator, coin.id).await.unwrap_err();
        assert!(matches!(again, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn only_the_creator_may_deploy_or_delete() {
        let svc = service();
        let coin = svc.create(Uuid::new_v4(), request("DGM")).await.unwrap();
        let stranger = Uuid::new_v4();
        assert!(matches!(
            svc.deploy(stranger, coin.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            svc.delete(stranger, coin.id).await,
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn deployed_coins_cannot_be_deleted() {
        let svc = service();
        let creator = Uuid::new_v4();
        let coin = svc.create(creator, request("DGM")).await.unwrap();
        svc.deploy(creator, coin.id).await.unwrap();
        assert!(matches!(
            svc.delete(creator, coin.id).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn blank_patch_fields_are_ignored() {
        let svc = service();
        let creator = Uuid::new_v4();
        let coin = svc.create(creator, request("DGM")).await.unwrap();
        let updated = svc
            .update(
                creator,
                coin.id,
                UpdateMemeCoinRequest {
                    name: Some("  ".into()),
                    description: Some("even more wow".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Doge Moon");
        assert_eq!(updated.description, "even more wow");

        let bad = svc
            .update(
                creator,
                coin.id,
                UpdateMemeCoinRequest {
                    website: Some("not a url".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(bad, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn stale_profile_edit_keeps_deployment_fields() {
        let store = Arc::new(MemoryStore::new());
        let svc = MemeCoinService::new(store.clone(), Arc::new(SimulatedDeployer::instant()));
        let creator = Uuid::new_v4();
        let snapshot = svc.create(creator, request("DGM")).await.unwrap();
        svc.deploy(creator, snapshot.id).await.unwrap();

        // An edit computed from the pre-deploy row lands after the deployment.
        let mut stale = snapshot.clone();
        stale.description = "written late".into();
        store.update_meme_coin_metadata(&stale).await.unwrap();

        let coin = svc.get_by_id(snapshot.id).await.unwrap();
        assert_eq!(coin.description, "written late");
        assert_eq!(coin.status, MemeCoinStatus::Deployed);
        assert!(coin.contract_address.is_some());
        assert!(coin.deployment_hash.is_some());
    }

    #[tokio::test]
    async fn bookkeeping_failure_after_claim_fails_the_coin() {
        let store = Arc::new(MemoryStore::new());
        let svc = MemeCoinService::new(store.clone(), Arc::new(SimulatedDeployer::instant()));
        let creator = Uuid::new_v4();
        let coin = svc.create(creator, request("DGM")).await.unwrap();

        store.fail_on("insert_deployment");
        assert!(matches!(
            svc.deploy(creator, coin.id).await,
            Err(ServiceError::Store(_))
        ));
        let failed = svc.get_by_id(coin.id).await.unwrap();
        assert_eq!(failed.status, MemeCoinStatus::Failed);
        assert!(failed.contract_address.is_none());
        assert!(svc.deployments(coin.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settled_payments_block_deletion() {
        let store = Arc::new(MemoryStore::new());
        let svc = MemeCoinService::new(store.clone(), Arc::new(SimulatedDeployer::instant()));
        let creator = Uuid::new_v4();
        let paid = svc.create(creator, request("PAID")).await.unwrap();
        let unpaid = svc.create(creator, request("UNPAID")).await.unwrap();

        let now = Utc::now();
        for (coin, status) in [(&paid, PaymentStatus::Completed), (&unpaid, PaymentStatus::Pending)] {
            store
                .insert_payment(&Payment {
                    id: Uuid::new_v4(),
                    meme_coin_id: coin.id,
                    amount: 0.01,
                    currency: "ETH".into(),
                    payment_method: "crypto".into(),
                    transaction_hash: None,
                    status,
                    paid_at: None,
                    user_id: creator,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }

        assert!(matches!(
            svc.delete(creator, paid.id).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert_eq!(store.payments_for_meme_coin(paid.id).await.unwrap().len(), 1);

        svc.delete(creator, unpaid.id).await.unwrap();
        assert!(store.payments_for_meme_coin(unpaid.id).await.unwrap().is_empty());
    }
}
