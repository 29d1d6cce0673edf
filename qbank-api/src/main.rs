//! # QBank API Server
//!
//! Serves the interview question bank: logins, interview submissions, the
//! shared question bank and the admin bulk account import.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/qbank SECRET_KEY=... INIT_DB=1 cargo run -p qbank-api
//! ```

use qbank_api::{
    app::{build_router, AppState},
    config::Config,
};
use qbank_shared::db::{
    migrations::initialize,
    pool::{close_pool, create_pool, PoolConfig},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qbank_api=debug,qbank_shared=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("QBank API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(PoolConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    if config.database.init {
        initialize(&pool, config.database.bootstrap_admin.as_ref()).await?;
    } else {
        tracing::info!("Database initialization skipped (set INIT_DB=1 to run migrations and seed the admin)");
    }

    let addr = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
