//! Service entry point: logging, configuration, database, catalog
//! ingestion, and the HTTP server.

use dotenvy::dotenv;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use trolley::{
    api::{self, AppState},
    config,
    errors::Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Initialize database and schema
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 4. Ingest the catalog seed file if one is present and tables are empty
    let catalog_path =
        std::env::var("CATALOG_FILE").unwrap_or_else(|_| "catalog.toml".to_string());
    if Path::new(&catalog_path).exists() {
        let catalog = config::catalog::load_catalog(&catalog_path)?;
        config::catalog::seed_catalog(&db, &catalog)
            .await
            .inspect_err(|e| error!("Catalog ingestion failed: {e}"))?;
    } else {
        info!("No catalog file at {catalog_path}, starting with current data.");
    }

    // 5. Serve the API
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8001".to_string());
    let app = api::router(AppState { db });
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Listening on {bind_addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
