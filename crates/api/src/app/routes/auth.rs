//! Registration, login, verification, and password-reset flows.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};

use connectcargo_accounts::{AccountRole, TokenPurpose};
use connectcargo_infra::RegistrationRequest;

use crate::app::{AppService, dto, errors};
use crate::app::routes::common::bearer_session;

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/verify-email/:token", get(verify_email))
        .route("/check-email", get(check_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/reset-password/:token", get(reset_password_form))
}

pub async fn register(
    Extension(service): Extension<Arc<AppService>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let role: AccountRole = match body.account_type.parse() {
        Ok(role) => role,
        Err(e) => return errors::auth_error_to_response(e),
    };
    if body.full_name.trim().is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "full name is required",
        );
    }

    match service.register(RegistrationRequest {
        email: body.email,
        password: body.password,
        confirm_password: body.confirm_password,
        role,
        full_name: body.full_name,
        phone: body.phone,
    }) {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "account_id": receipt.account_id.to_string(),
                "status": receipt.status.as_str(),
                "message": "registration successful, check your email for the verification link",
            })),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn login(
    Extension(service): Extension<Arc<AppService>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match service.login(&body.email, &body.password) {
        Ok((session, account)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "session": session.to_string(),
                "account": dto::account_to_json(&account),
            })),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn logout(
    Extension(service): Extension<Arc<AppService>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let session = match bearer_session(&headers) {
        Ok(session) => session,
        Err(resp) => return resp,
    };
    service.logout(session);
    StatusCode::NO_CONTENT.into_response()
}

pub async fn verify_email(
    Extension(service): Extension<Arc<AppService>>,
    Path(token): Path<String>,
) -> axum::response::Response {
    match service.verify_email(&token) {
        Ok(account) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "account": dto::account_to_json(&account),
                "message": "email verified, you can now log in",
            })),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn check_email(
    Extension(service): Extension<Arc<AppService>>,
    Query(params): Query<dto::CheckEmailParams>,
) -> axum::response::Response {
    let Some(email) = params.email.filter(|e| !e.trim().is_empty()) else {
        return (
            StatusCode::OK,
            Json(serde_json::json!({"valid": false, "exists": false})),
        )
            .into_response();
    };

    let (valid, exists) = service.email_status(&email);
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "valid": valid,
            "exists": exists,
            "message": if exists { "email already registered" } else { "email available" },
        })),
    )
        .into_response()
}

pub async fn forgot_password(
    Extension(service): Extension<Arc<AppService>>,
    Json(body): Json<dto::ForgotPasswordRequest>,
) -> axum::response::Response {
    // Deliberately uniform response: nothing to learn about account
    // existence from this endpoint.
    service.request_password_reset(&body.email);
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "message": "if this email exists and is verified, reset instructions have been sent",
        })),
    )
        .into_response()
}

/// Pre-flight check for the reset form: tells the client whether the link
/// is still good without consuming the token.
pub async fn reset_password_form(
    Extension(service): Extension<Arc<AppService>>,
    Path(token): Path<String>,
) -> axum::response::Response {
    match service.validate_token(TokenPurpose::Reset, &token) {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({"valid": true}))).into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}

pub async fn reset_password(
    Extension(service): Extension<Arc<AppService>>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> axum::response::Response {
    match service.reset_password(&body.token, &body.password, &body.confirm_password) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({"message": "password updated, you can now log in"})),
        )
            .into_response(),
        Err(e) => errors::auth_error_to_response(e),
    }
}
