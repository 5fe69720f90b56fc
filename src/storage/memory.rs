//! In-process backend used for `STORAGE_BACKEND=memory` and in tests.
//!
//! Mirrors the Postgres constraints: unique usernames, emails, meme coin
//! symbols, wallet addresses (case-insensitive), transaction hashes and
//! network chain ids.

use super::{
    ChainRepository, MemeCoinRepository, MemeCoinSearch, PaymentRepository, Storage, StoreError,
    StoreResult, TokenRepository, UserRepository,
};
use crate::domain::model::{
    DeploymentTransaction, MemeCoin, MemeCoinStatus, Network, Payment, PaymentStatus, Token,
    TokenAnalytics, TokenContract, TokenFeatures, TokenStatus, Transaction, User, Wallet,
};
use crate::domain::validation::Page;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    meme_coins: HashMap<Uuid, MemeCoin>,
    contracts: HashMap<Uuid, TokenContract>,
    deployments: Vec<DeploymentTransaction>,
    tokens: HashMap<Uuid, Token>,
    features: HashMap<Uuid, TokenFeatures>,
    analytics: HashMap<Uuid, TokenAnalytics>,
    networks: HashMap<Uuid, Network>,
    wallets: HashMap<Uuid, Wallet>,
    transactions: HashMap<Uuid, Transaction>,
    payments: HashMap<Uuid, Payment>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    #[cfg(test)]
    faults: std::sync::Mutex<Vec<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: every later call to `method` fails with a backend-style error.
    #[cfg(test)]
    pub(crate) fn fail_on(&self, method: &'static str) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.push(method);
        }
    }

    fn check_fault(&self, _method: &'static str) -> StoreResult<()> {
        #[cfg(test)]
        {
            let injected = self
                .faults
                .lock()
                .map(|faults| faults.contains(&_method))
                .unwrap_or(false);
            if injected {
                return Err(StoreError::Corrupt(format!("injected failure in {_method}")));
            }
        }
        Ok(())
    }
}

/// Sorts newest first, the order every list endpoint returns.
fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .collect()
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username".into()));
        }
        if let Some(email) = &user.email {
            if state.users.values().any(|u| u.email.as_ref() == Some(email)) {
                return Err(StoreError::Duplicate("email".into()));
            }
        }
        state.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, user: &User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if let Some(email) = &user.email {
            if state
                .users
                .values()
                .any(|u| u.id != user.id && u.email.as_ref() == Some(email))
            {
                return Err(StoreError::Duplicate("email".into()));
            }
        }
        if let Some(slot) = state.users.get_mut(&user.id) {
            *slot = user.clone();
        }
        Ok(())
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> StoreResult<()> {
        if let Some(user) = self.state.write().await.users.get_mut(&id) {
            user.last_login_at = Some(at);
            user.updated_at = at;
        }
        Ok(())
    }
}

#[async_trait]
impl MemeCoinRepository for MemoryStore {
    async fn insert_meme_coin(&self, coin: &MemeCoin) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state
            .meme_coins
            .values()
            .any(|c| c.symbol.eq_ignore_ascii_case(&coin.symbol))
        {
            return Err(StoreError::Duplicate("symbol".into()));
        }
        state.meme_coins.insert(coin.id, coin.clone());
        Ok(())
    }

    async fn meme_coin_by_id(&self, id: Uuid) -> StoreResult<Option<MemeCoin>> {
        Ok(self.state.read().await.meme_coins.get(&id).cloned())
    }

    async fn meme_coin_by_symbol(&self, symbol: &str) -> StoreResult<Option<MemeCoin>> {
        let state = self.state.read().await;
        Ok(state
            .meme_coins
            .values()
            .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
            .cloned())
    }

    async fn meme_coins_by_creator(&self, creator_id: Uuid) -> StoreResult<Vec<MemeCoin>> {
        let state = self.state.read().await;
        let coins = state
            .meme_coins
            .values()
            .filter(|c| c.creator_id == creator_id)
            .cloned()
            .collect();
        Ok(newest_first(coins, |c| c.created_at))
    }

    async fn list_meme_coins(&self, page: Page) -> StoreResult<Vec<MemeCoin>> {
        let state = self.state.read().await;
        let coins = state.meme_coins.values().cloned().collect();
        Ok(paginate(newest_first(coins, |c| c.created_at), page))
    }

    async fn search_meme_coins(&self, search: &MemeCoinSearch) -> StoreResult<Vec<MemeCoin>> {
        let needle = search.query.to_lowercase();
        let state = self.state.read().await;
        let coins = state
            .meme_coins
            .values()
            .filter(|c| {
                contains_ci(&c.name, &needle)
                    || contains_ci(&c.symbol, &needle)
                    || contains_ci(&c.description, &needle)
            })
            .filter(|c| search.network.as_deref().map_or(true, |n| c.network == n))
            .filter(|c| search.status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        Ok(paginate(newest_first(coins, |c| c.created_at), search.page))
    }

    async fn meme_coins_by_status(&self, status: MemeCoinStatus) -> StoreResult<Vec<MemeCoin>> {
        let state = self.state.read().await;
        let coins = state
            .meme_coins
            .values()
            .filter(|c| c.status == status)
            .cloned()
            .collect();
        Ok(newest_first(coins, |c| c.created_at))
    }

    async fn meme_coins_by_network(&self, network: &str, page: Page) -> StoreResult<Vec<MemeCoin>> {
        let state = self.state.read().await;
        let coins = state
            .meme_coins
            .values()
            .filter(|c| c.network == network)
            .cloned()
            .collect();
        Ok(paginate(newest_first(coins, |c| c.created_at), page))
    }

    async fn update_meme_coin_metadata(&self, coin: &MemeCoin) -> StoreResult<()> {
        if let Some(slot) = self.state.write().await.meme_coins.get_mut(&coin.id) {
            slot.name = coin.name.clone();
            slot.description = coin.description.clone();
            slot.image_url = coin.image_url.clone();
            slot.website = coin.website.clone();
            slot.twitter = coin.twitter.clone();
            slot.telegram = coin.telegram.clone();
            slot.discord = coin.discord.clone();
            slot.updated_at = coin.updated_at;
        }
        Ok(())
    }

    async fn delete_meme_coin(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.meme_coins.remove(&id).is_some();
        if removed {
            state.contracts.remove(&id);
            state.deployments.retain(|d| d.meme_coin_id != id);
            state.payments.retain(|_, p| p.meme_coin_id != id);
        }
        Ok(removed)
    }

    async fn transition_meme_coin(
        &self,
        id: Uuid,
        from: MemeCoinStatus,
        to: MemeCoinStatus,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.meme_coins.get_mut(&id) {
            Some(coin) if coin.status == from => {
                coin.status = to;
                coin.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete_meme_coin_deployment(
        &self,
        id: Uuid,
        contract_address: &str,
        deployment_hash: &str,
        deployed_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.meme_coins.get_mut(&id) {
            Some(coin) if coin.status == MemeCoinStatus::Deploying => {
                coin.status = MemeCoinStatus::Deployed;
                coin.contract_address = Some(contract_address.to_string());
                coin.deployment_hash = Some(deployment_hash.to_string());
                coin.deployed_at = Some(deployed_at);
                coin.updated_at = deployed_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_contract(&self, contract: &TokenContract) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.contracts.contains_key(&contract.meme_coin_id) {
            return Err(StoreError::Duplicate("meme_coin_id".into()));
        }
        state
            .contracts
            .insert(contract.meme_coin_id, contract.clone());
        Ok(())
    }

    async fn contract_for(&self, meme_coin_id: Uuid) -> StoreResult<Option<TokenContract>> {
        self.check_fault("contract_for")?;
        Ok(self.state.read().await.contracts.get(&meme_coin_id).cloned())
    }

    async fn insert_deployment(&self, deployment: &DeploymentTransaction) -> StoreResult<()> {
        self.check_fault("insert_deployment")?;
        let mut state = self.state.write().await;
        if state
            .deployments
            .iter()
            .any(|d| d.transaction_hash == deployment.transaction_hash)
        {
            return Err(StoreError::Duplicate("transaction_hash".into()));
        }
        state.deployments.push(deployment.clone());
        Ok(())
    }

    async fn deployments_for(&self, meme_coin_id: Uuid) -> StoreResult<Vec<DeploymentTransaction>> {
        let state = self.state.read().await;
        let deployments = state
            .deployments
            .iter()
            .filter(|d| d.meme_coin_id == meme_coin_id)
            .cloned()
            .collect();
        Ok(newest_first(deployments, |d| d.created_at))
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn insert_token(
        &self,
        token: &Token,
        features: &TokenFeatures,
        analytics: &TokenAnalytics,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.tokens.insert(token.id, token.clone());
        state.features.insert(token.id, features.clone());
        state.analytics.insert(token.id, analytics.clone());
        Ok(())
    }

    async fn token_by_id(&self, id: Uuid) -> StoreResult<Option<Token>> {
        Ok(self.state.read().await.tokens.get(&id).cloned())
    }

    async fn tokens_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Token>> {
        let state = self.state.read().await;
        let tokens = state
            .tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(tokens, |t| t.created_at))
    }

    async fn token_by_contract_address(&self, address: &str) -> StoreResult<Option<Token>> {
        let state = self.state.read().await;
        Ok(state
            .tokens
            .values()
            .find(|t| {
                t.contract_address
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(address))
            })
            .cloned())
    }

    async fn list_tokens(&self, page: Page) -> StoreResult<Vec<Token>> {
        let state = self.state.read().await;
        let tokens = state.tokens.values().cloned().collect();
        Ok(paginate(newest_first(tokens, |t| t.created_at), page))
    }

    async fn tokens_by_status(&self, status: TokenStatus) -> StoreResult<Vec<Token>> {
        let state = self.state.read().await;
        let tokens = state
            .tokens
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect();
        Ok(newest_first(tokens, |t| t.created_at))
    }

    async fn update_token_metadata(&self, token: &Token) -> StoreResult<()> {
        if let Some(slot) = self.state.write().await.tokens.get_mut(&token.id) {
            slot.name = token.name.clone();
            slot.description = token.description.clone();
            slot.image_url = token.image_url.clone();
            slot.website = token.website.clone();
            slot.twitter = token.twitter.clone();
            slot.telegram = token.telegram.clone();
            slot.discord = token.discord.clone();
            slot.updated_at = token.updated_at;
        }
        Ok(())
    }

    async fn delete_token(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let removed = state.tokens.remove(&id).is_some();
        if removed {
            state.features.remove(&id);
            state.analytics.remove(&id);
            for tx in state.transactions.values_mut() {
                if tx.token_id == Some(id) {
                    tx.token_id = None;
                }
            }
        }
        Ok(removed)
    }

    async fn transition_token(
        &self,
        id: Uuid,
        from: TokenStatus,
        to: TokenStatus,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.tokens.get_mut(&id) {
            Some(token) if token.status == from => {
                token.status = to;
                token.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn begin_token_deployment(
        &self,
        id: Uuid,
        network: &str,
        tx_hash: &str,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.tokens.get_mut(&id) {
            Some(token) if token.status == TokenStatus::Draft => {
                token.status = TokenStatus::Deploying;
                token.network = network.to_string();
                token.deployment_tx_hash = Some(tx_hash.to_string());
                token.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn complete_token_deployment(
        &self,
        id: Uuid,
        contract_address: &str,
        tx_hash: &str,
    ) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.tokens.get_mut(&id) {
            Some(token) if token.status == TokenStatus::Deploying => {
                token.status = TokenStatus::Deployed;
                token.contract_address = Some(contract_address.to_string());
                token.deployment_tx_hash = Some(tx_hash.to_string());
                token.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn token_features(&self, token_id: Uuid) -> StoreResult<Option<TokenFeatures>> {
        Ok(self.state.read().await.features.get(&token_id).cloned())
    }

    async fn update_token_features(&self, features: &TokenFeatures) -> StoreResult<()> {
        if let Some(slot) = self.state.write().await.features.get_mut(&features.token_id) {
            *slot = features.clone();
        }
        Ok(())
    }

    async fn token_analytics(&self, token_id: Uuid) -> StoreResult<Option<TokenAnalytics>> {
        Ok(self.state.read().await.analytics.get(&token_id).cloned())
    }

    async fn update_token_analytics(&self, analytics: &TokenAnalytics) -> StoreResult<()> {
        if let Some(slot) = self
            .state
            .write()
            .await
            .analytics
            .get_mut(&analytics.token_id)
        {
            *slot = analytics.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl ChainRepository for MemoryStore {
    async fn upsert_network(&self, network: &Network) -> StoreResult<Network> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .networks
            .values_mut()
            .find(|n| n.chain_id == network.chain_id)
        {
            existing.name = network.name.clone();
            existing.display_name = network.display_name.clone();
            existing.rpc_url = network.rpc_url.clone();
            existing.explorer_url = network.explorer_url.clone();
            existing.currency = network.currency.clone();
            existing.gas_price = network.gas_price.clone();
            existing.updated_at = Utc::now();
            return Ok(existing.clone());
        }
        if state.networks.values().any(|n| n.name == network.name) {
            return Err(StoreError::Duplicate("name".into()));
        }
        state.networks.insert(network.id, network.clone());
        Ok(network.clone())
    }

    async fn network_by_id(&self, id: Uuid) -> StoreResult<Option<Network>> {
        Ok(self.state.read().await.networks.get(&id).cloned())
    }

    async fn network_by_name(&self, name: &str) -> StoreResult<Option<Network>> {
        let state = self.state.read().await;
        Ok(state.networks.values().find(|n| n.name == name).cloned())
    }

    async fn network_by_chain_id(&self, chain_id: i64) -> StoreResult<Option<Network>> {
        let state = self.state.read().await;
        Ok(state
            .networks
            .values()
            .find(|n| n.chain_id == chain_id)
            .cloned())
    }

    async fn active_networks(&self) -> StoreResult<Vec<Network>> {
        let state = self.state.read().await;
        let mut networks: Vec<Network> = state
            .networks
            .values()
            .filter(|n| n.is_active)
            .cloned()
            .collect();
        networks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(networks)
    }

    async fn insert_wallet(&self, wallet: &Wallet) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state
            .wallets
            .values()
            .any(|w| w.address.eq_ignore_ascii_case(&wallet.address))
        {
            return Err(StoreError::Duplicate("address".into()));
        }
        state.wallets.insert(wallet.id, wallet.clone());
        Ok(())
    }

    async fn wallet_by_id(&self, id: Uuid) -> StoreResult<Option<Wallet>> {
        Ok(self.state.read().await.wallets.get(&id).cloned())
    }

    async fn wallets_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Wallet>> {
        let state = self.state.read().await;
        let wallets = state
            .wallets
            .values()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(wallets, |w| w.created_at))
    }

    async fn wallet_by_address(&self, address: &str) -> StoreResult<Option<Wallet>> {
        let state = self.state.read().await;
        Ok(state
            .wallets
            .values()
            .find(|w| w.address.eq_ignore_ascii_case(address))
            .cloned())
    }

    async fn delete_wallet(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.state.write().await.wallets.remove(&id).is_some())
    }

    async fn insert_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        self.check_fault("insert_transaction")?;
        let mut state = self.state.write().await;
        if state.transactions.values().any(|t| t.hash == tx.hash) {
            return Err(StoreError::Duplicate("hash".into()));
        }
        state.transactions.insert(tx.id, tx.clone());
        Ok(())
    }

    async fn transaction_by_hash(&self, hash: &str) -> StoreResult<Option<Transaction>> {
        let state = self.state.read().await;
        Ok(state
            .transactions
            .values()
            .find(|t| t.hash.eq_ignore_ascii_case(hash))
            .cloned())
    }

    async fn transactions_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let txs = state
            .transactions
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(txs, |t| t.created_at))
    }

    async fn transactions_by_token(&self, token_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let state = self.state.read().await;
        let txs = state
            .transactions
            .values()
            .filter(|t| t.token_id == Some(token_id))
            .cloned()
            .collect();
        Ok(newest_first(txs, |t| t.created_at))
    }

    async fn update_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        if let Some(slot) = self.state.write().await.transactions.get_mut(&tx.id) {
            *slot = tx.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn insert_payment(&self, payment: &Payment) -> StoreResult<()> {
        self.state
            .write()
            .await
            .payments
            .insert(payment.id, payment.clone());
        Ok(())
    }

    async fn payment_by_id(&self, id: Uuid) -> StoreResult<Option<Payment>> {
        Ok(self.state.read().await.payments.get(&id).cloned())
    }

    async fn payments_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Payment>> {
        let state = self.state.read().await;
        let payments = state
            .payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(payments, |p| p.created_at))
    }

    async fn payments_for_meme_coin(&self, meme_coin_id: Uuid) -> StoreResult<Vec<Payment>> {
        let state = self.state.read().await;
        let payments = state
            .payments
            .values()
            .filter(|p| p.meme_coin_id == meme_coin_id)
            .cloned()
            .collect();
        Ok(newest_first(payments, |p| p.created_at))
    }

    async fn transition_payment(&self, payment: &Payment, from: PaymentStatus) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.payments.get_mut(&payment.id) {
            Some(slot) if slot.status == from => {
                slot.status = payment.status;
                slot.transaction_hash = payment.transaction_hash.clone();
                slot.paid_at = payment.paid_at;
                slot.updated_at = payment.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
