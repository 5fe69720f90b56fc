use super::string_enum;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

string_enum! {
    WalletType, "wallet type" {
        Metamask => "metamask",
        WalletConnect => "walletconnect",
    }
}

string_enum! {
    TransactionType, "transaction type" {
        Deploy => "deploy",
        Transfer => "transfer",
        Mint => "mint",
        Burn => "burn",
    }
}

string_enum! {
    TransactionStatus, "transaction status" {
        Pending => "pending",
        Confirmed => "confirmed",
        Failed => "failed",
    }
}

/// A target chain. This is configuration, not a live connection.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Network {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub chain_id: i64,
    pub rpc_url: String,
    pub explorer_url: Option<String>,
    pub currency: String,
    pub is_active: bool,
    /// Default gas price in wei.
    pub gas_price: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address: String,
    pub wallet_type: WalletType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An on-chain transaction issued for a token (deployments today).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Transaction {
    pub id: Uuid,
    pub token_id: Option<Uuid>,
    pub user_id: Uuid,
    pub hash: String,
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub gas_used: Option<i64>,
    pub gas_price: Option<String>,
    pub block_number: Option<i64>,
    pub network_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
