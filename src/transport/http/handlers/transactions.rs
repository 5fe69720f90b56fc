use crate::transport::http::auth::AuthUser;
use crate::transport::http::error::ApiResult;
use crate::transport::http::handlers::common::ok;
use crate::transport::http::types::AppState;
use axum::extract::{Path, State};
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/api/transactions/{hash}",
    params(("hash" = String, Path, description = "0x-prefixed 32-byte transaction hash")),
    responses(
        (status = 200, description = "Transaction", body = ApiResponse),
        (status = 400, description = "Malformed hash", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn transaction_by_hash_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> ApiResult<Response> {
    ok(&state.chain.transaction_by_hash(hash.trim()).await?)
}

#[utoipa::path(
    get,
    path = "/api/user/transactions",
    responses(
        (status = 200, description = "Transactions issued by the caller", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn user_transactions_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Response> {
    ok(&state.chain.transactions_for_user(user.id).await?)
}
