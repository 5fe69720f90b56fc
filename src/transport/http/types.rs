use crate::app::{AuthService, ChainService, MemeCoinService, PaymentService, TokenService};
use crate::crypto::jwt::JwtKeys;
use crate::domain::model::MemeCoinStatus;
use crate::domain::validation::{Page, ValidationError};
use crate::infra::chain::{ChainRpc, SimulatedDeployer};
use crate::infra::config::Config;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Storage>,
    pub auth: Arc<AuthService>,
    pub meme_coins: Arc<MemeCoinService>,
    pub tokens: Arc<TokenService>,
    pub chain: Arc<ChainService>,
    pub payments: Arc<PaymentService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Storage>, rpc: Arc<dyn ChainRpc>, config: &Config) -> Self {
        let keys = JwtKeys::new(config.jwt_secret.as_bytes(), config.jwt_ttl);
        let token_deployer = Arc::new(SimulatedDeployer::new(config.deploy_delay));
        Self {
            auth: Arc::new(AuthService::new(store.clone(), keys)),
            meme_coins: Arc::new(MemeCoinService::new(
                store.clone(),
                Arc::new(SimulatedDeployer::instant()),
            )),
            tokens: Arc::new(TokenService::new(store.clone(), token_deployer)),
            chain: Arc::new(ChainService::new(store.clone(), rpc)),
            payments: Arc::new(PaymentService::new(store.clone())),
            store,
        }
    }
}

/// Envelope for every JSON response.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-100, default 20. Anything else falls back to the default.
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Page {
        Page::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemeCoinListQuery {
    /// Restrict to one network.
    pub network: Option<String>,
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

impl MemeCoinListQuery {
    pub fn page(&self) -> Page {
        Page::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive match on name, symbol or description.
    pub q: Option<String>,
    pub network: Option<String>,
    #[param(value_type = Option<MemeCoinStatus>)]
    pub status: Option<String>,
    #[param(value_type = Option<i64>)]
    pub limit: Option<String>,
    #[param(value_type = Option<i64>)]
    pub offset: Option<String>,
}

impl SearchQuery {
    pub fn page(&self) -> Page {
        Page::from_raw(self.limit.as_deref(), self.offset.as_deref())
    }

    /// Blank means no filter; an unknown status is a validation error.
    pub fn status(&self) -> Result<Option<MemeCoinStatus>, ValidationError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => raw
                .to_ascii_lowercase()
                .parse()
                .map(Some)
                .map_err(|_| ValidationError::new("status", format!("unknown status '{raw}'"))),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub storage: String,
}
