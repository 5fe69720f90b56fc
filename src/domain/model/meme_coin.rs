use super::string_enum;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

string_enum! {
    /// Lifecycle of a meme coin: `pending -> deploying -> deployed`, or `failed`.
    MemeCoinStatus, "meme coin status" {
        Pending => "pending",
        Deploying => "deploying",
        Deployed => "deployed",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemeCoin {
    pub id: Uuid,
    pub name: String,
    /// Always stored uppercase.
    pub symbol: String,
    pub description: String,
    /// Whole-token supply as a decimal integer string.
    pub total_supply: String,
    pub decimals: u8,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub contract_address: Option<String>,
    pub network: String,
    pub status: MemeCoinStatus,
    pub deployment_hash: Option<String>,
    pub deployed_at: Option<DateTime<Utc>>,
    pub creator_id: Uuid,
    /// Deployment price in the network's native currency.
    pub price: f64,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generated contract artifacts attached to a meme coin.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenContract {
    pub id: Uuid,
    pub meme_coin_id: Uuid,
    pub contract_code: String,
    pub abi: String,
    pub bytecode: String,
    pub constructor_args: String,
    pub network: String,
    pub gas_limit: i64,
    pub gas_price: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeploymentTransaction {
    pub id: Uuid,
    pub meme_coin_id: Uuid,
    pub transaction_hash: String,
    pub block_number: i64,
    pub gas_used: i64,
    pub gas_price: String,
    pub status: super::TransactionStatus,
    pub deployed_at: DateTime<Utc>,
    pub network: String,
    pub created_at: DateTime<Utc>,
}
