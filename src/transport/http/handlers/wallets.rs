use crate::app::chain_service::ConnectWalletRequest;
use crate::transport::http::auth::AuthUser;
use crate::transport::http::error::{json_body, ApiResult};
use crate::transport::http::handlers::common::{ok, parse_id, respond};
use crate::transport::http::types::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/wallets",
    request_body = ConnectWalletRequest,
    responses(
        (status = 201, description = "Wallet connected", body = ApiResponse),
        (status = 400, description = "Malformed address", body = ApiResponse),
        (status = 409, description = "Address already connected", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn connect_wallet_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<ConnectWalletRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let wallet = state
        .chain
        .connect_wallet(user.id, json_body(request)?)
        .await?;
    respond(StatusCode::CREATED, &wallet)
}

#[utoipa::path(
    get,
    path = "/api/wallets",
    responses((status = 200, description = "Wallets connected by the caller", body = ApiResponse)),
    security(("bearer" = []))
)]
pub async fn list_wallets_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Response> {
    ok(&state.chain.wallets(user.id).await?)
}

#[utoipa::path(
    delete,
    path = "/api/wallets/{id}",
    params(("id" = String, Path, description = "Wallet id")),
    responses(
        (status = 200, description = "Wallet disconnected", body = ApiResponse),
        (status = 403, description = "Wallet belongs to another user", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn disconnect_wallet_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("wallet", &id)?;
    state.chain.disconnect_wallet(user.id, id).await?;
    ok(&serde_json::json!({ "id": id, "disconnected": true }))
}
