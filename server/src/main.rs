//! Back-office Server binary.

use std::sync::Arc;

use backoffice_server::catalog::Catalog;
use backoffice_server::config::Config;
use backoffice_server::db::{self, MemoryRepository, Repository};
use backoffice_server::handlers::now_millis;
use backoffice_server::{app, seed, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backoffice_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Back-office Server on {}:{}", config.host, config.port);

    let seed_rows = seed::mock_data(now_millis());
    let repo = match &config.database_url {
        Some(url) => {
            let pool = db::connect(url).await?;
            for (collection, rows) in &seed_rows {
                let inserted = db::seed_collection(&pool, collection, rows).await?;
                if inserted > 0 {
                    tracing::info!(collection = %collection, inserted, "seeded collection");
                }
            }
            Repository::Postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving mock data from memory");
            Repository::memory(MemoryRepository::seeded(seed_rows))
        }
    };

    let catalog = Catalog::builtin(config.default_page_size);
    tracing::info!(
        storage = repo.kind(),
        views = catalog.views().len(),
        "storage ready"
    );

    let state = AppState {
        repo,
        catalog: Arc::new(catalog),
        config: Arc::new(config.clone()),
    };

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
