use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use wallet_ledger::config::StorageBackend;
use wallet_ledger::storage::{LedgerStore, MemoryLedgerStore, PgLedgerStore};
use wallet_ledger::{build_router, database, services, telemetry, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let config = Arc::new(Config::from_env()?);
    telemetry::init_tracing(config.log_format);

    info!("Starting wallet ledger server...");

    let (store, pg_store): (Arc<dyn LedgerStore>, Option<PgLedgerStore>) = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = database::new_pool(&config).await?;
            info!("Database connection pool created");
            let pg = PgLedgerStore::new(pool);
            let store: Arc<dyn LedgerStore> = Arc::new(pg.clone());
            (store, Some(pg))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; balances are lost on exit");
            let store: Arc<dyn LedgerStore> = Arc::new(MemoryLedgerStore::new());
            (store, None)
        }
    };

    services::seed_wallets(
        store.as_ref(),
        config.seed_wallet_count,
        config.seed_initial_balance,
    )
    .await?;

    let app = build_router(AppState::new(store, config.clone()));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }

    if let Some(pg) = pg_store {
        pg.pool().close().await;
        info!("Database connection pool closed");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, shutting down gracefully...");
}
