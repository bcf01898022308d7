use std::sync::Arc;

use ferrobank_api::config::AppConfig;
use ferrobank_infra::{InMemoryLedgerStore, LedgerStore, PgLedgerStore};

#[tokio::main]
async fn main() {
    ferrobank_observability::init();

    let config = AppConfig::from_env();

    let store: Arc<dyn LedgerStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(8)
                .connect(url)
                .await
                .expect("failed to connect to database");

            let store = PgLedgerStore::new(pool);
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (state is not durable)");
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app = ferrobank_api::app::build_app(config, store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
