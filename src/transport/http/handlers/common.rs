use crate::transport::http::error::{ApiError, ApiResult};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

/// Wraps `data` in a successful envelope with the given status.
pub fn respond<T: Serialize>(status: StatusCode, data: &T) -> ApiResult<Response> {
    let value = serde_json::to_value(data).map_err(|e| {
        tracing::error!(error = %e, "Response serialization failed");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    })?;
    Ok((status, Json(ApiResponse::ok(value))).into_response())
}

pub fn ok<T: Serialize>(data: &T) -> ApiResult<Response> {
    respond(StatusCode::OK, data)
}

/// Path ids arrive as strings so a malformed one is a 400 in the envelope.
pub fn parse_id(what: &str, raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("invalid {what} id '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_bad_requests() {
        let err = parse_id("token", "not-a-uuid").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let id = Uuid::new_v4();
        assert_eq!(parse_id("token", &id.to_string()).unwrap(), id);
    }
}
