use std::sync::Arc;

use connectcargo_infra::{
    AccountService, InMemoryAccountStore, InMemorySessionStore, Mailer, TracingMailer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    connectcargo_observability::init();

    let base_url = std::env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| {
        tracing::warn!("PUBLIC_BASE_URL not set; links use the dev default");
        "http://localhost:8080".to_string()
    });
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let mailer: Arc<dyn Mailer> = Arc::new(TracingMailer);
    let service = Arc::new(AccountService::new(
        InMemoryAccountStore::arc(),
        mailer,
        InMemorySessionStore::arc(),
        base_url,
    ));

    let app = connectcargo_api::app::build_app(service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
