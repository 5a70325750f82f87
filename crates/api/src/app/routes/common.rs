use axum::http::{HeaderMap, StatusCode, header};

use connectcargo_core::SessionId;

use crate::app::errors;

/// Extract the opaque session id from `Authorization: Bearer <session>`.
pub fn bearer_session(headers: &HeaderMap) -> Result<SessionId, axum::response::Response> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing session")
        })?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "expected a bearer session",
        )
    })?;

    token.parse::<SessionId>().map_err(|_| {
        errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "malformed session")
    })
}
