use axum::Router;

pub mod auth;
pub mod common;
pub mod system;
pub mod welcome;

pub fn router() -> Router {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/welcome", welcome::router())
}
