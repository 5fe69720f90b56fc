use crate::transport::http::error::ApiResult;
use crate::transport::http::handlers::common::ok;
use crate::transport::http::types::AppState;
use axum::extract::{Path, State};
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/api/networks",
    responses((status = 200, description = "Active networks", body = ApiResponse))
)]
pub async fn list_networks_handler(State(state): State<AppState>) -> ApiResult<Response> {
    ok(&state.chain.active_networks().await?)
}

#[utoipa::path(
    get,
    path = "/api/networks/{name}",
    params(("name" = String, Path, description = "Network name, e.g. ethereum")),
    responses(
        (status = 200, description = "Network configuration and meme coin deployment cost", body = ApiResponse),
        (status = 404, description = "Unknown network", body = ApiResponse)
    )
)]
pub async fn network_info_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    ok(&state.chain.network_info(&name).await?)
}

#[utoipa::path(
    get,
    path = "/api/networks/{name}/gas-price",
    params(("name" = String, Path, description = "Network name")),
    responses(
        (status = 200, description = "Gas price in wei (live or default)", body = ApiResponse),
        (status = 404, description = "Unknown network", body = ApiResponse)
    )
)]
pub async fn gas_price_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    ok(&state.chain.gas_price(&name).await?)
}

#[utoipa::path(
    get,
    path = "/api/networks/{name}/balance/{address}",
    params(
        ("name" = String, Path, description = "Network name"),
        ("address" = String, Path, description = "0x-prefixed account address")
    ),
    responses(
        (status = 200, description = "Native balance in wei", body = ApiResponse),
        (status = 400, description = "Malformed address", body = ApiResponse),
        (status = 404, description = "Unknown network", body = ApiResponse),
        (status = 502, description = "RPC endpoint failed", body = ApiResponse)
    )
)]
pub async fn balance_handler(
    State(state): State<AppState>,
    Path((name, address)): Path<(String, String)>,
) -> ApiResult<Response> {
    ok(&state.chain.balance(&name, address.trim()).await?)
}
