use super::{map_write_err, parse_col, small_u8, PgStore};
use crate::domain::model::{Token, TokenAnalytics, TokenFeatures, TokenStatus};
use crate::domain::validation::Page;
use crate::storage::{StoreResult, TokenRepository};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, name, symbol, description, total_supply, decimals, \
    contract_address, network, image_url, website, twitter, telegram, discord, status, \
    deployment_tx_hash, created_at, updated_at";

fn token_from_row(row: &PgRow) -> StoreResult<Token> {
    Ok(Token {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        symbol: row.try_get("symbol")?,
        description: row.try_get("description")?,
        total_supply: row.try_get("total_supply")?,
        decimals: small_u8(row, "decimals")?,
        contract_address: row.try_get("contract_address")?,
        network: row.try_get("network")?,
        image_url: row.try_get("image_url")?,
        website: row.try_get("website")?,
        twitter: row.try_get("twitter")?,
        telegram: row.try_get("telegram")?,
        discord: row.try_get("discord")?,
        status: parse_col(row, "status")?,
        deployment_tx_hash: row.try_get("deployment_tx_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn features_from_row(row: &PgRow) -> StoreResult<TokenFeatures> {
    Ok(TokenFeatures {
        token_id: row.try_get("token_id")?,
        is_mintable: row.try_get("is_mintable")?,
        is_burnable: row.try_get("is_burnable")?,
        is_pausable: row.try_get("is_pausable")?,
        has_max_supply: row.try_get("has_max_supply")?,
        has_taxes: row.try_get("has_taxes")?,
        buy_tax_percentage: small_u8(row, "buy_tax_percentage")?,
        sell_tax_percentage: small_u8(row, "sell_tax_percentage")?,
        is_anti_whale: row.try_get("is_anti_whale")?,
        max_tx_amount: row.try_get("max_tx_amount")?,
        max_wallet_amount: row.try_get("max_wallet_amount")?,
    })
}

fn analytics_from_row(row: &PgRow) -> StoreResult<TokenAnalytics> {
    Ok(TokenAnalytics {
        token_id: row.try_get("token_id")?,
        holders: row.try_get("holders")?,
        transactions: row.try_get("transactions")?,
        volume_24h: row.try_get("volume_24h")?,
        market_cap: row.try_get("market_cap")?,
        price: row.try_get("price")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn tokens_from_rows(rows: &[PgRow]) -> StoreResult<Vec<Token>> {
    rows.iter().map(token_from_row).collect()
}

#[async_trait]
impl TokenRepository for PgStore {
    async fn insert_token(
        &self,
        token: &Token,
        features: &TokenFeatures,
        analytics: &TokenAnalytics,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!(
            "INSERT INTO tokens ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18)"
        ))
        .bind(token.id)
        .bind(token.user_id)
        .bind(&token.name)
        .bind(&token.symbol)
        .bind(&token.description)
        .bind(&token.total_supply)
        .bind(token.decimals as i16)
        .bind(&token.contract_address)
        .bind(&token.network)
        .bind(&token.image_url)
        .bind(&token.website)
        .bind(&token.twitter)
        .bind(&token.telegram)
        .bind(&token.discord)
        .bind(token.status.as_str())
        .bind(&token.deployment_tx_hash)
        .bind(token.created_at)
        .bind(token.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_err)?;

        sqlx::query(
            "INSERT INTO token_features (token_id, is_mintable, is_burnable, is_pausable,
                has_max_supply, has_taxes, buy_tax_percentage, sell_tax_percentage,
                is_anti_whale, max_tx_amount, max_wallet_amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(token.id)
        .bind(features.is_mintable)
        .bind(features.is_burnable)
        .bind(features.is_pausable)
        .bind(features.has_max_supply)
        .bind(features.has_taxes)
        .bind(features.buy_tax_percentage as i16)
        .bind(features.sell_tax_percentage as i16)
        .bind(features.is_anti_whale)
        .bind(&features.max_tx_amount)
        .bind(&features.max_wallet_amount)
        .execute(&mut *tx)
        .await
        .map_err(map_write_err)?;

        sqlx::query(
            "INSERT INTO token_analytics (token_id, holders, transactions, volume_24h,
                market_cap, price, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(token.id)
        .bind(analytics.holders)
        .bind(analytics.transactions)
        .bind(&analytics.volume_24h)
        .bind(&analytics.market_cap)
        .bind(&analytics.price)
        .bind(analytics.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_err)?;

        tx.commit().await?;
        Ok(())
    }

    async fn token_by_id(&self, id: Uuid) -> StoreResult<Option<Token>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM tokens WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(token_from_row).transpose()
    }

    async fn tokens_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Token>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tokens WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        tokens_from_rows(&rows)
    }

    async fn token_by_contract_address(&self, address: &str) -> StoreResult<Option<Token>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tokens WHERE LOWER(contract_address) = LOWER($1)"
        ))
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(token_from_row).transpose()
    }

    async fn list_tokens(&self, page: Page) -> StoreResult<Vec<Token>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tokens ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        tokens_from_rows(&rows)
    }

    async fn tokens_by_status(&self, status: TokenStatus) -> StoreResult<Vec<Token>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM tokens WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        tokens_from_rows(&rows)
    }

    async fn update_token_metadata(&self, token: &Token) -> StoreResult<()> {
        sqlx::query(
            "UPDATE tokens SET name = $2, description = $3, image_url = $4, website = $5,
                twitter = $6, telegram = $7, discord = $8, updated_at = $9
             WHERE id = $1",
        )
        .bind(token.id)
        .bind(&token.name)
        .bind(&token.description)
        .bind(&token.image_url)
        .bind(&token.website)
        .bind(&token.twitter)
        .bind(&token.telegram)
        .bind(&token.discord)
        .bind(token.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn delete_token(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_token(
        &self,
        id: Uuid,
        from: TokenStatus,
        to: TokenStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE tokens SET status = $3, updated_at = $4 WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn begin_token_deployment(
        &self,
        id: Uuid,
        network: &str,
        tx_hash: &str,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE tokens SET status = $2, network = $3, deployment_tx_hash = $4, updated_at = $5
             WHERE id = $1 AND status = $6",
        )
        .bind(id)
        .bind(TokenStatus::Deploying.as_str())
        .bind(network)
        .bind(tx_hash)
        .bind(Utc::now())
        .bind(TokenStatus::Draft.as_str())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn complete_token_deployment(
        &self,
        id: Uuid,
        contract_address: &str,
        tx_hash: &str,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE tokens SET status = $2, contract_address = $3, deployment_tx_hash = $4,
                updated_at = $5
             WHERE id = $1 AND status = $6",
        )
        .bind(id)
        .bind(TokenStatus::Deployed.as_str())
        .bind(contract_address)
        .bind(tx_hash)
        .bind(Utc::now())
        .bind(TokenStatus::Deploying.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(result.rows_affected() == 1)
    }

    async fn token_features(&self, token_id: Uuid) -> StoreResult<Option<TokenFeatures>> {
        let row = sqlx::query("SELECT * FROM token_features WHERE token_id = $1")
            .bind(token_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(features_from_row).transpose()
    }

    async fn update_token_features(&self, features: &TokenFeatures) -> StoreResult<()> {
        sqlx::query(
            "UPDATE token_features SET is_mintable = $2, is_burnable = $3, is_pausable = $4,
                has_max_supply = $5, has_taxes = $6, buy_tax_percentage = $7,
                sell_tax_percentage = $8, is_anti_whale = $9, max_tx_amount = $10,
                max_wallet_amount = $11
             WHERE token_id = $1",
        )
        .bind(features.token_id)
        .bind(features.is_mintable)
        .bind(features.is_burnable)
        .bind(features.is_pausable)
        .bind(features.has_max_supply)
        .bind(features.has_taxes)
        .bind(features.buy_tax_percentage as i16)
        .bind(features.sell_tax_percentage as i16)
        .bind(features.is_anti_whale)
        .bind(&features.max_tx_amount)
        .bind(&features.max_wallet_amount)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn token_analytics(&self, token_id: Uuid) -> StoreResult<Option<TokenAnalytics>> {
        let row = sqlx::query("SELECT * FROM token_analytics WHERE token_id = $1")
            .bind(token_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(analytics_from_row).transpose()
    }

    async fn update_token_analytics(&self, analytics: &TokenAnalytics) -> StoreResult<()> {
        sqlx::query(
            "UPDATE token_analytics SET holders = $2, transactions = $3, volume_24h = $4,
                market_cap = $5, price = $6, updated_at = $7
             WHERE token_id = $1",
        )
        .bind(analytics.token_id)
        .bind(analytics.holders)
        .bind(analytics.transactions)
        .bind(&analytics.volume_24h)
        .bind(&analytics.market_cap)
        .bind(&analytics.price)
        .bind(analytics.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
