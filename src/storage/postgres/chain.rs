use super::{map_write_err, parse_col, PgStore};
use crate::domain::model::{Network, Transaction, Wallet};
use crate::storage::{ChainRepository, StoreResult};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

const NETWORK_COLUMNS: &str = "id, name, display_name, chain_id, rpc_url, explorer_url, currency, \
    is_active, gas_price, created_at, updated_at";

const WALLET_COLUMNS: &str = "id, user_id, address, wallet_type, is_active, created_at, updated_at";

const TX_COLUMNS: &str = "id, token_id, user_id, hash, tx_type, status, gas_used, gas_price, \
    block_number, network_id, created_at, updated_at";

fn network_from_row(row: &PgRow) -> StoreResult<Network> {
    Ok(Network {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        display_name: row.try_get("display_name")?,
        chain_id: row.try_get("chain_id")?,
        rpc_url: row.try_get("rpc_url")?,
        explorer_url: row.try_get("explorer_url")?,
        currency: row.try_get("currency")?,
        is_active: row.try_get("is_active")?,
        gas_price: row.try_get("gas_price")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn wallet_from_row(row: &PgRow) -> StoreResult<Wallet> {
    Ok(Wallet {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        address: row.try_get("address")?,
        wallet_type: parse_col(row, "wallet_type")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn transaction_from_row(row: &PgRow) -> StoreResult<Transaction> {
    Ok(Transaction {
        id: row.try_get("id")?,
        token_id: row.try_get("token_id")?,
        user_id: row.try_get("user_id")?,
        hash: row.try_get("hash")?,
        tx_type: parse_col(row, "tx_type")?,
        status: parse_col(row, "status")?,
        gas_used: row.try_get("gas_used")?,
        gas_price: row.try_get("gas_price")?,
        block_number: row.try_get("block_number")?,
        network_id: row.try_get("network_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ChainRepository for PgStore {
    async fn upsert_network(&self, network: &Network) -> StoreResult<Network> {
        let row = sqlx::query(&format!(
            "INSERT INTO networks ({NETWORK_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             ON CONFLICT (chain_id) DO UPDATE SET
                name = EXCLUDED.name,
                display_name = EXCLUDED.display_name,
                rpc_url = EXCLUDED.rpc_url,
                explorer_url = EXCLUDED.explorer_url,
                currency = EXCLUDED.currency,
                gas_price = EXCLUDED.gas_price,
                updated_at = EXCLUDED.updated_at
             RETURNING {NETWORK_COLUMNS}"
        ))
        .bind(network.id)
        .bind(&network.name)
        .bind(&network.display_name)
        .bind(network.chain_id)
        .bind(&network.rpc_url)
        .bind(&network.explorer_url)
        .bind(&network.currency)
        .bind(network.is_active)
        .bind(&network.gas_price)
        .bind(network.created_at)
        .bind(network.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_err)?;
        network_from_row(&row)
    }

    async fn network_by_id(&self, id: Uuid) -> StoreResult<Option<Network>> {
        let row = sqlx::query(&format!("SELECT {NETWORK_COLUMNS} FROM networks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(network_from_row).transpose()
    }

    async fn network_by_name(&self, name: &str) -> StoreResult<Option<Network>> {
        let row = sqlx::query(&format!(
            "SELECT {NETWORK_COLUMNS} FROM networks WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(network_from_row).transpose()
    }

    async fn network_by_chain_id(&self, chain_id: i64) -> StoreResult<Option<Network>> {
        let row = sqlx::query(&format!(
            "SELECT {NETWORK_COLUMNS} FROM networks WHERE chain_id = $1"
        ))
        .bind(chain_id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(network_from_row).transpose()
    }

    async fn active_networks(&self) -> StoreResult<Vec<Network>> {
        let rows = sqlx::query(&format!(
            "SELECT {NETWORK_COLUMNS} FROM networks WHERE is_active ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(network_from_row).collect()
    }

    async fn insert_wallet(&self, wallet: &Wallet) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO wallets ({WALLET_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        ))
        .bind(wallet.id)
        .bind(wallet.user_id)
        .bind(&wallet.address)
        .bind(wallet.wallet_type.as_str())
        .bind(wallet.is_active)
        .bind(wallet.created_at)
        .bind(wallet.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn wallet_by_id(&self, id: Uuid) -> StoreResult<Option<Wallet>> {
        let row = sqlx::query(&format!("SELECT {WALLET_COLUMNS} FROM wallets WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(wallet_from_row).transpose()
    }

    async fn wallets_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Wallet>> {
        let rows = sqlx::query(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(wallet_from_row).collect()
    }

    async fn wallet_by_address(&self, address: &str) -> StoreResult<Option<Wallet>> {
        let row = sqlx::query(&format!(
            "SELECT {WALLET_COLUMNS} FROM wallets WHERE LOWER(address) = LOWER($1)"
        ))
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(wallet_from_row).transpose()
    }

    async fn delete_wallet(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM wallets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        sqlx::query(&format!(
            "INSERT INTO transactions ({TX_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)"
        ))
        .bind(tx.id)
        .bind(tx.token_id)
        .bind(tx.user_id)
        .bind(&tx.hash)
        .bind(tx.tx_type.as_str())
        .bind(tx.status.as_str())
        .bind(tx.gas_used)
        .bind(&tx.gas_price)
        .bind(tx.block_number)
        .bind(tx.network_id)
        .bind(tx.created_at)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_err)?;
        Ok(())
    }

    async fn transaction_by_hash(&self, hash: &str) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE LOWER(hash) = LOWER($1)"
        ))
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(transaction_from_row).transpose()
    }

    async fn transactions_by_user(&self, user_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(transaction_from_row).collect()
    }

    async fn transactions_by_token(&self, token_id: Uuid) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query(&format!(
            "SELECT {TX_COLUMNS} FROM transactions WHERE token_id = $1 ORDER BY created_at DESC"
        ))
        .bind(token_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(transaction_from_row).collect()
    }

    async fn update_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        sqlx::query(
            "UPDATE transactions SET status = $2, gas_used = $3, gas_price = $4,
                block_number = $5, updated_at = $6
             WHERE id = $1",
        )
        .bind(tx.id)
        .bind(tx.status.as_str())
        .bind(tx.gas_used)
        .bind(&tx.gas_price)
        .bind(tx.block_number)
        .bind(tx.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
