use std::sync::Arc;

use anyhow::Context;

use profdash_api::app::services::AppServices;
use profdash_api::config::ApiConfig;
use profdash_store::{DocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    profdash_observability::init();

    let config = ApiConfig::load();

    // A storage outage at boot is fatal: the service never starts degraded.
    let store = PgDocumentStore::connect(&config.database_url)
        .await
        .context("failed to connect to the document store")?;
    store
        .ensure_schema()
        .await
        .context("failed to prepare the professor collection schema")?;
    tracing::info!("connected to the document store");

    let store: Arc<dyn DocumentStore> = Arc::new(store);
    profdash_store::seed_if_empty(store.as_ref())
        .await
        .context("failed to seed the professor collection")?;

    let services = Arc::new(AppServices::new(
        store,
        config.token_service(),
        config.admin_credentials(),
    ));
    let app = profdash_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
