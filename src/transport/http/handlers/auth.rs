use crate::app::auth_service::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::transport::http::auth::AuthUser;
use crate::transport::http::error::{json_body, ApiResult};
use crate::transport::http::handlers::common::{ok, respond};
use crate::transport::http::types::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse),
        (status = 400, description = "Invalid field", body = ApiResponse),
        (status = 409, description = "Username or email taken", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse)
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let user = state.auth.register(json_body(request)?).await?;
    respond(StatusCode::CREATED, &user)
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = ApiResponse),
        (status = 401, description = "Invalid credentials", body = ApiResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let session = state.auth.login(json_body(request)?).await?;
    ok(&session)
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current user", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn profile_handler(State(state): State<AppState>, user: AuthUser) -> ApiResult<Response> {
    ok(&state.auth.profile(user.id).await?)
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse),
        (status = 400, description = "Invalid field", body = ApiResponse),
        (status = 401, description = "Missing or invalid token", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn update_profile_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let updated = state
        .auth
        .update_profile(user.id, json_body(request)?)
        .await?;
    ok(&updated)
}

#[utoipa::path(
    put,
    path = "/api/user/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse),
        (status = 400, description = "New password too weak", body = ApiResponse),
        (status = 401, description = "Current password incorrect", body = ApiResponse)
    ),
    security(("bearer" = []))
)]
pub async fn change_password_handler(
    State(state): State<AppState>,
    user: AuthUser,
    request: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<Response> {
    state
        .auth
        .change_password(user.id, json_body(request)?)
        .await?;
    ok(&serde_json::json!({ "message": "password updated" }))
}
