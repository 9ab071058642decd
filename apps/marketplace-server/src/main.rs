//! Marketplace server binary: configuration, database, service wiring,
//! HTTP serving with graceful shutdown.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use marketplace::api::rest::auth::AuthState;
use marketplace::api::rest::routes::build_router;
use marketplace::api::rest::{AppState, ConcreteServices};
use marketplace::config::MarketplaceConfig;
use marketplace::domain::ports::{Notifier, NullNotifier};
use marketplace::domain::service::{AppServices, ServiceConfig};
use marketplace::infra::authn::HttpAuthClient;
use marketplace::infra::notify::WebhookNotifier;
use marketplace::infra::storage::migrations::Migrator;
use marketplace::infra::storage::{
    SeaBranchesRepository, SeaCatalogRepository, SeaFavoritesRepository, SeaReviewsRepository,
    SeaVendorsRepository,
};
use marketplace::infra::uploads::ImageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let cfg = MarketplaceConfig::load(config_path.as_deref()).context("loading configuration")?;

    info!("Connecting to database");
    let mut opts = ConnectOptions::new(cfg.database.url.clone());
    opts.max_connections(cfg.database.max_connections)
        .connect_timeout(Duration::from_secs(cfg.database.connect_timeout_secs));
    let db = Database::connect(opts)
        .await
        .context("connecting to database")?;

    info!("Running migrations");
    Migrator::up(&db, None).await.context("running migrations")?;

    let notifier: Arc<dyn Notifier> = if cfg.webhooks.endpoints.is_empty() {
        Arc::new(NullNotifier)
    } else {
        Arc::new(WebhookNotifier::new(&cfg.webhooks).context("building webhook client")?)
    };

    let services: Arc<ConcreteServices> = Arc::new(AppServices::new(
        db.clone(),
        SeaVendorsRepository::new(),
        SeaBranchesRepository::new(),
        SeaCatalogRepository::new(),
        SeaFavoritesRepository::new(),
        SeaReviewsRepository::new(),
        notifier,
        ServiceConfig::default(),
    ));

    let auth_client = HttpAuthClient::new(&cfg.auth)
        .map_err(|e| anyhow::anyhow!("building auth client: {e}"))?;
    let auth_state = AuthState {
        auth_client: Arc::new(auth_client),
    };
    let state = AppState {
        services,
        images: Arc::new(ImageStore::new(&cfg.uploads)),
    };

    let app = build_router(state, auth_state, &cfg.server);

    let address = format!("{}:{}", cfg.server.host, cfg.server.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .context("binding listener")?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    info!("Draining database pool");
    db.close().await.context("closing database pool")?;

    info!("Server shut down");
    Ok(())
}

#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
