use crate::domain::model::Network;
use crate::domain::networks::{NetworkInfo, CATALOGUE};
use crate::storage::{Storage, StoreResult};
use chrono::Utc;
use uuid::Uuid;

pub fn network_from_catalogue(info: &NetworkInfo) -> Network {
    let now = Utc::now();
    Network {
        id: Uuid::new_v4(),
        name: info.name.to_string(),
        display_name: info.display_name.to_string(),
        chain_id: info.chain_id as i64,
        rpc_url: info.rpc_url.to_string(),
        explorer_url: Some(info.explorer_url.to_string()),
        currency: info.currency.to_string(),
        is_active: true,
        gas_price: info.gas_price_wei.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Upserts every catalogue entry by chain id. Safe to run on every start.
pub async fn seed_networks(store: &dyn Storage) -> StoreResult<usize> {
    for info in CATALOGUE {
        let stored = store.upsert_network(&network_from_catalogue(info)).await?;
        tracing::debug!(network = %stored.name, chain_id = stored.chain_id, "Seeded network");
    }
    tracing::info!(count = CATALOGUE.len(), "Network catalogue seeded");
    Ok(CATALOGUE.len())
}
