//! Role-gated landing endpoints: the session gate's HTTP surface.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};

use connectcargo_accounts::AccountRole;

use crate::app::{AppService, dto, errors};
use crate::app::routes::common::bearer_session;

pub fn router() -> Router {
    Router::new()
        .route("/company", get(welcome_company))
        .route("/carrier", get(welcome_carrier))
}

pub async fn welcome_company(
    Extension(service): Extension<Arc<AppService>>,
    headers: HeaderMap,
) -> axum::response::Response {
    gated(service, headers, AccountRole::Company)
}

pub async fn welcome_carrier(
    Extension(service): Extension<Arc<AppService>>,
    headers: HeaderMap,
) -> axum::response::Response {
    gated(service, headers, AccountRole::Carrier)
}

fn gated(
    service: Arc<AppService>,
    headers: HeaderMap,
    required: AccountRole,
) -> axum::response::Response {
    let session = match bearer_session(&headers) {
        Ok(session) => session,
        Err(resp) => return resp,
    };

    match service.authorize_session(session, required) {
        Ok(account) => {
            let profile = service
                .profile_of(account.account_id())
                .as_ref()
                .map(dto::profile_to_json);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "account": dto::account_to_json(&account),
                    "profile": profile,
                })),
            )
                .into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}
