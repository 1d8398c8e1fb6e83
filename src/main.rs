use std::sync::Arc;

use anyhow::{Context, Result};
use mongo_balancer::{
    build_router,
    config::{AppConfig, StoreBackend},
    memory::MemoryCluster,
    mongo::MongoFactory,
    registry::NodeRegistry,
    state::AppState,
    store::ConnectionFactory,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("failed to load application configuration")?;
    let registry = NodeRegistry::default_nodes();

    let factory: Arc<dyn ConnectionFactory> = match config.store_backend {
        StoreBackend::Mongo => {
            info!("store backend: mongodb");
            Arc::new(MongoFactory)
        }
        StoreBackend::Memory => {
            info!("store backend: in-memory");
            Arc::new(MemoryCluster::for_registry(&registry).with_proxy_alias(&config.proxy_uri))
        }
    };

    let addr = config.address();
    let app = build_router(AppState::new(config, registry, factory));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(address = %addr, "mongo balancer demo started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mongo_balancer=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
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
}
