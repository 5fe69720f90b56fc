use super::{map_write_err, parse_col, small_u8, PgStore};
use crate::domain::model::{DeploymentTransaction, MemeCoin, MemeCoinStatus, TokenContract};
use crate::domain::validation::Page;
use crate::storage::{MemeCoinRepository, MemeCoinSearch, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

const COLUMNS: &str = "id, name, symbol, description, total_supply, decimals, image_url, website, \
    twitter, telegram, discord, contract_address, network, status, deployment_hash, deployed_at, \
    creator_id, price, is_verified, created_at, updated_at";

const CONTRACT_COLUMNS: &str = "id, meme_coin_id, contract_code, abi, bytecode, constructor_args, \
    network, gas_limit, gas_price, created_at";

const DEPLOYMENT_COLUMNS: &str = "id, meme_coin_id, transaction_hash, block_number, gas_used, \
    gas_price, status, deployed_at, network, created_at";

fn coin_from_row(row: &PgRow) -> StoreResult<MemeCoin> {
    Ok(MemeCoin {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        symbol: row.try_get("symbol")?,
        description: row.try_get("description")?,
        total_supply: row.try_get("total_supply")?,
        decimals: small_u8(row, "decimals")?,
        image_url: row.try_get("image_url")?,
        website: row.try_get("website")?,
        twitter: row.try_get("twitter")?,
        telegram: row.try_get("telegram")?,
        discord: row.try_get("discord")?,
        contract_address: row.try_get("contract_address")?,
        network: row.try_get("network")?,
        status: parse_col(row, "status")?,
        deployment_hash: row.try_get("deployment_hash")?,
        deployed_at: row.try_get("deployed_at")?,
        creator_id: row.try_get("creator_id")?,
        price: row.try_get("price")?,
        is_verified: row.try_get("is_verified")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn contract_from_row(row: &PgRow) -> StoreResult<TokenContract> {
    Ok(TokenContract {
        id: row.try_get("id")?,
        meme_coin_id: row.try_get("meme_coin_id")?,
        contract_code: row.try_get("contract_code")?,
        abi: row.try_get("abi")?,
        bytecode: row.try_get("bytecode")?,
        constructor_args: row.try_get("constructor_args")?,
        network: row.try_get("network")?,
        gas_limit: row.try_get("gas_limit")?,
        gas_price: row.try_get("gas_price")?,
        created_at: row.try_get("created_at")?,
    })
}

fn deployment_from_row(row: &PgRow) -> StoreResult<DeploymentTransaction> {
    Ok(DeploymentTransaction {
        id: row.try_get("id")?,
        meme_coin_id: row.try_get("meme_coin_id")?,
        transaction_hash: row.try_get("transaction_hash")?,
        block_number: row.try_get("block_number")?,
        gas_used: row.try_get("gas_used")?,
        gas_price: row.try_get("gas_price")?,
        status: parse_col(row, "status")?,
        deployed_at: row.try_get("deployed_at")?,
        network: row.try_get("network")?,
        created_at: row.try_get("created_at")?,
    })
}

fn coins_from_rows(rows: &[PgRow]) -> StoreResult<Vec<MemeCoin>> {
    rows.iter().map(coin_from_row).collect()
}

/// Escapes LIKE wildcards so user input only matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl MemeCoinRepository for PgStore {
    async fn insert_meme_coin(&self, coin: &MemeCoin) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO meme_coins ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)"
        ))
        .bind(coin.id)
        .bind(&coin.name)
        .bind(&coin.symbol)
        .bind(&coin.description)
        .bind(&coin.total_supply)
        .bind(coin.decimals as i16)
        .bind(&coin.image_url)
        .bind(&coin.website)
        .bind(&coin.twitter)
        .bind(&coin.telegram)
        .bind(&coin.discord)
        .bind(&coin.contract_address)
        .bind(&coin.network)
        .bind(coin.status.as_str())
        .bind(&coin.deployment_hash)
        .bind(coin.deployed_at)
        .bind(coin.creator_id)
        .bind(coin.price)
        .bind(coin.is_verified)
        .bind(coin.created_at)
        .bind(coin.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn meme_coin_by_id(&self, id: Uuid) -> StoreResult<Option<MemeCoin>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM meme_coins WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(coin_from_row).transpose()
    }

    async fn meme_coin_by_symbol(&self, symbol: &str) -> StoreResult<Option<MemeCoin>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM meme_coins WHERE symbol = UPPER($1)"
        ))
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(coin_from_row).transpose()
    }

    async fn meme_coins_by_creator(&self, creator_id: Uuid) -> StoreResult<Vec<MemeCoin>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM meme_coins WHERE creator_id = $1 ORDER BY created_at DESC"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;
        coins_from_rows(&rows)
    }

    async fn list_meme_coins(&self, page: Page) -> StoreResult<Vec<MemeCoin>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM meme_coins ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        coins_from_rows(&rows)
    }

    async fn search_meme_coins(&self, search: &MemeCoinSearch) -> StoreResult<Vec<MemeCoin>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM meme_coins
             WHERE (name ILIKE $1 OR symbol ILIKE $1 OR description ILIKE $1)
               AND ($2::TEXT IS NULL OR network = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(like_pattern(&search.query))
        .bind(&search.network)
        .bind(search.status.map(|s| s.as_str()))
        .bind(search.page.limit)
        .bind(search.page.offset)
        .fetch_all(&self.pool)
        .await?;
        coins_from_rows(&rows)
    }

    async fn meme_coins_by_status(&self, status: MemeCoinStatus) -> StoreResult<Vec<MemeCoin>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM meme_coins WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        coins_from_rows(&rows)
    }

    async fn meme_coins_by_network(&self, network: &str, page: Page) -> StoreResult<Vec<MemeCoin>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM meme_coins WHERE network = $1
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(network)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        coins_from_rows(&rows)
    }

    async fn update_meme_coin_metadata(&self, coin: &MemeCoin) -> StoreResult<()> {
        sqlx::query(
            "UPDATE meme_coins SET name = $2, description = $3, image_url = $4, website = $5,
                twitter = $6, telegram = $7, discord = $8, updated_at = $9
             WHERE id = $1",
        )
        .bind(coin.id)
        .bind(&coin.name)
        .bind(&coin.description)
        .bind(&coin.image_url)
        .bind(&coin.website)
        .bind(&coin.twitter)
        .bind(&coin.telegram)
        .bind(&coin.discord)
        .bind(coin.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn delete_meme_coin(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM meme_coins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn transition_meme_coin(
        &self,
        id: Uuid,
        from: MemeCoinStatus,
        to: MemeCoinStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE meme_coins SET status = $3, updated_at = $4 WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn complete_meme_coin_deployment(
        &self,
        id: Uuid,
        contract_address: &str,
        deployment_hash: &str,
        deployed_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE meme_coins SET status = $2, contract_address = $3, deployment_hash = $4,
                deployed_at = $5, updated_at = $5
             WHERE id = $1 AND status = $6",
        )
        .bind(id)
        .bind(MemeCoinStatus::Deployed.as_str())
        .bind(contract_address)
        .bind(deployment_hash)
        .bind(deployed_at)
        .bind(MemeCoinStatus::Deploying.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_contract(&self, contract: &TokenContract) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO token_contracts ({CONTRACT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(contract.id)
        .bind(contract.meme_coin_id)
        .bind(&contract.contract_code)
        .bind(&contract.abi)
        .bind(&contract.bytecode)
        .bind(&contract.constructor_args)
        .bind(&contract.network)
        .bind(contract.gas_limit)
        .bind(&contract.gas_price)
        .bind(contract.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn contract_for(&self, meme_coin_id: Uuid) -> StoreResult<Option<TokenContract>> {
        let row = sqlx::query(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM token_contracts WHERE meme_coin_id = $1"
        ))
        .bind(meme_coin_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(contract_from_row).transpose()
    }

    async fn insert_deployment(&self, deployment: &DeploymentTransaction) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO deployment_transactions ({DEPLOYMENT_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"
        ))
        .bind(deployment.id)
        .bind(deployment.meme_coin_id)
        .bind(&deployment.transaction_hash)
        .bind(deployment.block_number)
        .bind(deployment.gas_used)
        .bind(&deployment.gas_price)
        .bind(deployment.status.as_str())
        .bind(deployment.deployed_at)
        .bind(&deployment.network)
        .bind(deployment.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn deployments_for(&self, meme_coin_id: Uuid) -> StoreResult<Vec<DeploymentTransaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {DEPLOYMENT_COLUMNS} FROM deployment_transactions
             WHERE meme_coin_id = $1 ORDER BY created_at DESC"
        ))
        .bind(meme_coin_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(deployment_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(like_pattern("doge"), "%doge%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
