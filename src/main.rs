//! AdminKit demo server — product catalog admin.
//!
//! Wires the generic CRUD stack end to end: configuration, logging,
//! database pool and migrations, the product module, and the Axum
//! server.

mod product;
mod views;

use std::sync::Arc;

use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use adminkit_core::config::AppConfig;
use adminkit_core::error::AppError;
use adminkit_crud::controller::CrudController;
use adminkit_crud::grid::{GridColumn, GridFactory, GridRegistry};
use adminkit_crud::view::ViewEngine;
use adminkit_database::PgEntityStore;
use adminkit_web::{SessionFlashStore, crud_routes};

use crate::product::{Product, ProductModule};
use crate::views::AdminViews;

#[tokio::main]
async fn main() {
    let env = std::env::var("ADMINKIT_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AdminKit v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = adminkit_database::connection::create_pool(&config.database).await?;
    adminkit_database::migration::run_migrations(&db_pool).await?;

    // ── Step 2: Shared collaborators ─────────────────────────────
    let mut grids = GridRegistry::new();
    grids.register(
        "product_grid",
        vec![
            GridColumn::sortable("name", "Name"),
            GridColumn::sortable("sku", "SKU"),
            GridColumn::sortable("price_cents", "Price (cents)"),
            GridColumn::plain("created_at", "Created"),
        ],
    );
    let grids: Arc<dyn GridFactory> = Arc::new(grids);
    let views: Arc<dyn ViewEngine> = Arc::new(AdminViews::new());
    let flash = Arc::new(SessionFlashStore::new());

    // ── Step 3: CRUD controllers ─────────────────────────────────
    let product_store = Arc::new(PgEntityStore::<Product>::new(db_pool.clone()));
    let products = Arc::new(CrudController::new(
        ProductModule,
        product_store,
        Arc::clone(&grids),
        Arc::clone(&views),
    ));
    let product_prefix = products.configuration()?.route_prefix().to_string();

    // ── Step 4: Router ───────────────────────────────────────────
    let app = axum::Router::new()
        .route("/health", axum::routing::get(|| async { "ok" }))
        .nest(&product_prefix, crud_routes(products, Arc::clone(&flash)))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // ── Step 5: Serve with graceful shutdown ─────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("AdminKit server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("AdminKit server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
