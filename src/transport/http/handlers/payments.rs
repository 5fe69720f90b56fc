use crate::app::payment_service::{CreatePaymentRequest, ProcessPaymentRequest};
use crate::transport::http::auth::AuthUser;
use crate::transport::http::error::{json_body, ApiError, ApiResult};
use crate::transport::http::handlers::common::{ok, parse_id, respond};
use crate::transport::http::types::AppState;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment created (pending)", body = ApiResponse),
        (status = 400, description = "Unsupported currency or amount below minimum", body = ApiResponse),
        (status = 404, description = "Unknown meme coin", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn create_payment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<CreatePaymentRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let payment = state.payments.create(user.id, json_body(request)?).await?;
    respond(StatusCode::CREATED, &payment)
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment", body = ApiResponse),
        (status = 403, description = "Payment belongs to another user", body = ApiResponse),
        (status = 404, description = "Not found", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn get_payment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("payment", &id)?;
    ok(&state.payments.get(user.id, id).await?)
}

#[utoipa::path(
    post,
    path = "/api/payments/{id}/process",
    params(("id" = String, Path, description = "Payment id")),
    request_body(content = ProcessPaymentRequest, description = "Optional; omit to simulate a hash"),
    responses(
        (status = 200, description = "Payment completed", body = ApiResponse),
        (status = 400, description = "Malformed transaction hash", body = ApiResponse),
        (status = 409, description = "Payment is not pending", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn process_payment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Response> {
    let id = parse_id("payment", &id)?;
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ProcessPaymentRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid JSON body: {}", e))
        })?
    };
    ok(&state.payments.process(user.id, id, request).await?)
}

#[utoipa::path(
    post,
    path = "/api/payments/{id}/refund",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment refunded", body = ApiResponse),
        (status = 409, description = "Payment is not completed", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn refund_payment_handler(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = parse_id("payment", &id)?;
    ok(&state.payments.refund(user.id, id).await?)
}

#[utoipa::path(
    get,
    path = "/api/user/payments",
    responses((status = 200, description = "Payments made by the caller", body = ApiResponse)),
    security(("bearer" = []))
)]
pub async fn user_payments_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Response> {
    ok(&state.payments.list_for_user(user.id).await?)
}
