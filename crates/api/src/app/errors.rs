use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use connectcargo_accounts::{AccessDenied, AuthError};

/// Map the auth taxonomy onto HTTP statuses. Messages come from the error
/// display impls (already written for end users).
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    let message = err.to_string();
    let (status, code) = match &err {
        AuthError::DuplicateEmail => (StatusCode::CONFLICT, "duplicate_email"),
        AuthError::WeakPassword(_) => (StatusCode::BAD_REQUEST, "weak_password"),
        AuthError::PasswordMismatch => (StatusCode::BAD_REQUEST, "password_mismatch"),
        AuthError::InvalidRole(_) => (StatusCode::BAD_REQUEST, "invalid_role"),
        AuthError::InvalidEmail(_) => (StatusCode::BAD_REQUEST, "invalid_email"),
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        AuthError::LockedOut => (StatusCode::LOCKED, "locked_out"),
        AuthError::InvalidToken => (StatusCode::BAD_REQUEST, "invalid_token"),
        AuthError::ExpiredToken => (StatusCode::GONE, "expired_token"),
        AuthError::ProfileAlreadyBound => (StatusCode::CONFLICT, "profile_already_bound"),
        AuthError::Unauthorized(AccessDenied::NoSession) => {
            (StatusCode::UNAUTHORIZED, "unauthorized")
        }
        AuthError::Unauthorized(_) => (StatusCode::FORBIDDEN, "unauthorized"),
        AuthError::RegistrationFailed => {
            (StatusCode::INTERNAL_SERVER_ERROR, "registration_failed")
        }
        AuthError::VerificationFailed => {
            (StatusCode::INTERNAL_SERVER_ERROR, "verification_failed")
        }
    };
    json_error(status, code, message)
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
