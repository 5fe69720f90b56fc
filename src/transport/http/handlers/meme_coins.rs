use crate::app::meme_coin_service::{CreateMemeCoinRequest, UpdateMemeCoinRequest};
use crate::storage::MemeCoinSearch;
use crate::transport::http::auth::AuthUser;
use crate::transport::http::error::{json_body, query_params, ApiError, ApiResult};
use crate::transport::http::handlers::common::{ok, parse_id, respond};
use crate::transport::http::types::{AppState, MemeCoinListQuery, SearchQuery};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/meme-coins",
    request_body = CreateMemeCoinRequest,
    responses(
        (status = 201, description = "Meme coin created (pending)", body = ApiResponse),
        (status = 400, description = "Invalid field", body = ApiResponse),
        (status = 409, description = "Symbol already exists", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_meme_coin_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<CreateMemeCoinRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let coin = state.meme_coins.create(user.id, json_body(request)?).await?;
    respond(StatusCode::CREATED, &coin)
}

#[utoipa::path(
    get,
    path = "/api/meme-coins",
    params(MemeCoinListQuery),
    responses((status = 200, description = "Meme coins, newest first", body = ApiResponse))
)]
pub async fn list_meme_coins_handler(
    State(state): State<AppState>,
    query: Result<Query<MemeCoinListQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let query = query_params(query)?;
    let page = query.page();
    let coins = match query.network.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        Some(network) => state.meme_coins.list_by_network(network, page).await?,
        None => state.meme_coins.list(page).await?,
    };
    ok(&coins)
}

#[utoipa::path(
    get,
    path = "/api/meme-coins/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching meme coins", body = ApiResponse),
        (status = 400, description = "Unknown status filter", body = ApiResponse)
    )
)]
pub async fn search_meme_coins_handler(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let query = query_params(query)?;
    let status = query.status().map_err(|e| ApiError::bad_request(e.to_string()))?;
    let page = query.page();
    let search = MemeCoinSearch {
        query: query.q.unwrap_or_default(),
        network: query.network.filter(|n| !n.trim().is_empty()),
        status,
        page,
    };
    ok(&state.meme_coins.search(search).await?)
}

#[utoipa::path(
    get,
    path = "/api/meme-coins/symbol/{symbol}",
    params(("symbol" = String, Path, description = "Ticker, any case")),
    responses(
        (status = 200, description = "Meme coin", body = ApiResponse),
        (status = 404, description = "Unknown symbol", body = ApiResponse)
    )
)]
pub async fn meme_coin_by_symbol_handler(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> ApiResult<Response> {
    ok(&state.meme_coins.get_by_symbol(&symbol).await?)
}

#[utoipa::path(
    get,
    path = "/api/meme-coins/{id}",
    params(("id" = String, Path, description = "Meme coin id")),
    responses(
        (status = 200, description = "Meme coin", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn get_meme_coin_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("meme coin", &id)?;
    ok(&state.meme_coins.get_by_id(id).await?)
}

#[utoipa::path(
    put,
    path = "/api/meme-coins/{id}",
    params(("id" = String, Path, description = "Meme coin id")),
    request_body = UpdateMemeCoinRequest,
    responses(
        (status = 200, description = "Meme coin updated", body = ApiResponse),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_meme_coin_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    request: Result<Json<UpdateMemeCoinRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let id = parse_id("meme coin", &id)?;
    let coin = state
        .meme_coins
        .update(user.id, id, json_body(request)?)
        .await?;
    ok(&coin)
}

#[utoipa::path(
    delete,
    path = "/api/meme-coins/{id}",
    params(("id" = String, Path, description = "Meme coin id")),
    responses(
        (status = 200, description = "Meme coin deleted", body = ApiResponse),
        (status = 400, description = "Already deployed", body = ApiResponse),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 409, description = "Deploying, or has settled payments", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn delete_meme_coin_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("meme coin", &id)?;
    state.meme_coins.delete(user.id, id).await?;
    ok(&serde_json::json!({ "id": id, "deleted": true }))
}

#[utoipa::path(
    post,
    path = "/api/meme-coins/{id}/deploy",
    params(("id" = String, Path, description = "Meme coin id")),
    responses(
        (status = 200, description = "Deployed; returns the deployment transaction", body = ApiResponse),
        (status = 403, description = "Not the creator", body = ApiResponse),
        (status = 409, description = "Not pending", body = ApiResponse),
        (status = 502, description = "Deployment failed", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn deploy_meme_coin_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("meme coin", &id)?;
    let deployment = state.meme_coins.deploy(user.id, id).await?;
    let coin = state.meme_coins.get_by_id(id).await?;
    ok(&serde_json::json!({ "meme_coin": coin, "deployment": deployment }))
}

#[utoipa::path(
    get,
    path = "/api/meme-coins/{id}/contract",
    params(("id" = String, Path, description = "Meme coin id")),
    responses(
        (status = 200, description = "Generated contract", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn meme_coin_contract_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("meme coin", &id)?;
    ok(&state.meme_coins.contract(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/meme-coins/{id}/deployments",
    params(("id" = String, Path, description = "Meme coin id")),
    responses(
        (status = 200, description = "Deployment transactions, newest first", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    )
)]
pub async fn meme_coin_deployments_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("meme coin", &id)?;
    ok(&state.meme_coins.deployments(id).await?)
}

#[utoipa::path(
    get,
    path = "/api/user/meme-coins",
    responses(
        (status = 200, description = "Meme coins created by the caller", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn user_meme_coins_handler(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Response> {
    ok(&state.meme_coins.list_by_creator(user.id).await?)
}
