use crate::app::token_service::{CreateTokenRequest, DeployTokenRequest, UpdateTokenRequest};
use crate::transport::http::auth::AuthUser;
use crate::transport::http::error::{json_body, query_params, ApiResult};
use crate::transport::http::handlers::common::{ok, parse_id, respond};
use crate::transport::http::types::{AppState, PageQuery};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/tokens",
    request_body = CreateTokenRequest,
    responses(
        (status = 201, description = "Token created as a draft", body = ApiResponse),
        (status = 400, description = "Invalid field", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_token_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<CreateTokenRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let token = state.tokens.create(user.id, json_body(request)?).await?;
    respond(StatusCode::CREATED, &token)
}

#[utoipa::path(
    get,
    path = "/api/tokens",
    params(PageQuery),
    responses((status = 200, description = "Tokens, newest first", body = ApiResponse))
)]
pub async fn list_tokens_handler(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Response> {
    ok(&state.tokens.list(query_params(query)?.page()).await?)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{id}",
    params(("id" = String, Path, description = "Token id")),
    responses(
        (status = 200, description = "Token", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn get_token_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    ok(&state.tokens.get(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/tokens/address/{address}",
    params(("address" = String, Path, description = "Deployed contract address")),
    responses(
        (status = 200, description = "Token", body = ApiResponse),
        (status = 400, description = "Malformed address", body = ApiResponse),
        (status = 404, description = "No token at that address", body = ApiResponse)
    )
)]
pub async fn token_by_address_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Response> {
    ok(&state.tokens.get_by_contract_address(address.trim()).await?)
}

#[utoipa::path(
    put,
    path = "/api/tokens/{id}",
    params(("id" = String, Path, description = "Token id")),
    request_body = UpdateTokenRequest,
    responses(
        (status = 200, description = "Token updated", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 409, description = "Features are frozen after deployment starts", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_token_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    request: Result<Json<UpdateTokenRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    ok(&state.tokens.update(user.id, id, json_body(request)?).await?)
}

#[utoipa::path(
    delete,
    path = "/api/tokens/{id}",
    params(("id" = String, Path, description = "Token id")),
    responses(
        (status = 200, description = "Token deleted", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 409, description = "Only drafts can be deleted", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn delete_token_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    state.tokens.delete(user.id, id).await?;
    ok(&serde_json::json!({ "id": id, "deleted": true }))
}

#[utoipa::path(
    post,
    path = "/api/tokens/deploy",
    request_body = DeployTokenRequest,
    responses(
        (status = 202, description = "Deployment started; returns the pending transaction", body = ApiResponse),
        (status = 400, description = "Network inactive", body = ApiResponse),
        (status = 403, description = "Not the owner", body = ApiResponse),
        (status = 404, description = "Unknown token or network", body = ApiResponse),
        (status = 409, description = "Token is not a draft", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn deploy_token_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<DeployTokenRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let tx = state.tokens.deploy(user.id, json_body(request)?).await?;
    respond(StatusCode::ACCEPTED, &tx)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{id}/features",
    params(("id" = String, Path, description = "Token id")),
    responses(
        (status = 200, description = "Selected ERC-20 extensions", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn token_features_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    ok(&state.tokens.features(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{id}/analytics",
    params(("id" = String, Path, description = "Token id")),
    responses(
        (status = 200, description = "Token analytics", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn token_analytics_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    ok(&state.tokens.analytics(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{id}/contract",
    params(("id" = String, Path, description = "Token id")),
    responses(
        (status = 200, description = "Generated Solidity source, ABI and bytecode", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn token_contract_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    ok(&state.tokens.contract_code(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{id}/transactions",
    params(("id" = String, Path, description = "Token id")),
    responses(
        (status = 200, description = "Transactions issued for the token", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn token_transactions_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("token", &id)?;
    ok(&state.tokens.transactions(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/user/tokens",
    responses(
        (status = 200, description = "Tokens owned by the caller", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn user_tokens_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Response> {
    ok(&state.tokens.list_by_user(user.id).await?)
}
