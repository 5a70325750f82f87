//! HTTP application wiring (axum router + handlers).
//!
//! Folder layout:
//! - `routes/`: HTTP routes + handlers (auth flows, gated welcome pages,
//!   health)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use connectcargo_infra::{AccountService, InMemoryAccountStore, InMemorySessionStore, Mailer};

pub mod dto;
pub mod errors;
pub mod routes;

/// The service wiring used by this process: in-memory store and sessions,
/// any mailer behind the port.
pub type AppService =
    AccountService<Arc<InMemoryAccountStore>, Arc<dyn Mailer>, Arc<InMemorySessionStore>>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(service))
}
