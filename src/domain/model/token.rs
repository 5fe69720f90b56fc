use super::string_enum;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

string_enum! {
    /// Lifecycle of a token: `draft -> deploying -> deployed`, or `failed`.
    TokenStatus, "token status" {
        Draft => "draft",
        Deploying => "deploying",
        Deployed => "deployed",
        Failed => "failed",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Token {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub total_supply: String,
    pub decimals: u8,
    pub contract_address: Option<String>,
    pub network: String,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub twitter: Option<String>,
    pub telegram: Option<String>,
    pub discord: Option<String>,
    pub status: TokenStatus,
    pub deployment_tx_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional ERC-20 extensions selected at creation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TokenFeatures {
    #[serde(default)]
    pub token_id: Uuid,
    #[serde(default)]
    pub is_mintable: bool,
    #[serde(default)]
    pub is_burnable: bool,
    #[serde(default)]
    pub is_pausable: bool,
    #[serde(default)]
    pub has_max_supply: bool,
    #[serde(default)]
    pub has_taxes: bool,
    #[serde(default)]
    pub buy_tax_percentage: u8,
    #[serde(default)]
    pub sell_tax_percentage: u8,
    #[serde(default)]
    pub is_anti_whale: bool,
    #[serde(default)]
    pub max_tx_amount: Option<String>,
    #[serde(default)]
    pub max_wallet_amount: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenAnalytics {
    pub token_id: Uuid,
    pub holders: i64,
    pub transactions: i64,
    pub volume_24h: String,
    pub market_cap: String,
    pub price: String,
    pub updated_at: DateTime<Utc>,
}

impl TokenAnalytics {
    /// Analytics row created alongside a fresh token.
    pub fn empty(token_id: Uuid) -> Self {
        Self {
            token_id,
            holders: 0,
            transactions: 0,
            volume_24h: "0".to_string(),
            market_cap: "0".to_string(),
            price: "0".to_string(),
            updated_at: Utc::now(),
        }
    }
}
