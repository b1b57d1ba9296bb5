mod api;
mod app_state;
mod env_config;
mod error;
mod layers;
mod logger;
mod models;
mod services;

use app_state::models::AppState;
use axum::{Extension, Router, routing::get};
use env_config::models::{app_config::AppConfig, app_env::AppEnv, app_setting::AppSettings};
use layers::{create_cors, create_trace};
use services::sample_store::{seed_source::StructFileSeedSource, store::SampleStore};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    // Settings and logging
    let settings: Arc<AppSettings> = Arc::new(initialize_application().await);

    // Seed data is read once and shared read-only
    let sample_store = Arc::new(initialize_sample_store(&settings).await);

    let server_address: SocketAddr = match format!(
        "{}:{}",
        settings.app_env.server_address, settings.app_env.server_port,
    )
    .parse()
    {
        Ok(address) => address,
        Err(err) => {
            error!("Invalid server address configuration: {}", err);
            panic!("Cannot start server: {}", err);
        }
    };

    info!("Server will listen on: {}", server_address);

    let app_state: Arc<AppState> = Arc::new(AppState::new(settings.clone(), sample_store));

    let app_router = create_application_router(app_state.clone());

    start_http_server(app_router, server_address, app_state).await;

    info!("Application stopped");
}

/// Loads environment and file configuration, then installs the logger
async fn initialize_application() -> AppSettings {
    let environment = AppEnv::new();
    let config = AppConfig::new(&environment.env);
    let app_settings = AppSettings {
        app_config: config,
        app_env: environment,
    };

    logger::init_logger(
        &app_settings.app_config.log.level,
        &app_settings.app_config.log.format,
        app_settings.app_env.is_local(),
    )
    .unwrap_or_else(|err| panic!("Failed to initialize logger: {}", err));

    info!("Starting fridge telemetry service...");
    info!("Current environment: {}", app_settings.app_env.env);

    if app_settings.app_env.is_local() {
        info!("Running in local development mode");
        debug!("Configuration details: {:#?}", app_settings);
    } else {
        info!("Running in production mode");
    }

    app_settings
}

async fn initialize_sample_store(settings: &AppSettings) -> SampleStore {
    let source = StructFileSeedSource::new(&settings.app_config.seed.path);
    info!("Loading seed data from {}", source.path().display());

    let store = SampleStore::load(&source).await;
    if store.is_empty() {
        warn!("Seed collection is empty; /dummy and /settings will return no records");
    } else {
        info!("Seed collection ready: {} records", store.len());
    }
    store
}

/// Builds the router with every endpoint and middleware
fn create_application_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api-health", get(api::health_api))
        .route("/settings", get(api::settings))
        .route("/dummy", get(api::dummy))
        .route("/live", get(api::live))
        .route("/historical", get(api::historical))
        .route("/ws", get(api::ws_live))
        .route("/ws/live", get(api::ws_live))
        .layer(Extension(app_state))
        .layer(create_cors())
        .layer(create_trace())
}

/// Serves until Ctrl-C or SIGTERM, then closes every streaming connection
async fn start_http_server(app: Router, addr: SocketAddr, app_state: Arc<AppState>) {
    info!("Starting HTTP server on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind to address {}: {}", addr, err);
            panic!("Cannot start server: {}", err);
        }
    };

    info!("Server started successfully, now accepting connections");

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(app_state))
        .await
    {
        error!("Server error: {}", err);
        panic!("Server failed: {}", err);
    }
}

async fn shutdown_signal(app_state: Arc<AppState>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, initiating shutdown"),
        _ = terminate => info!("SIGTERM received, initiating shutdown"),
    }

    let report = app_state.registry.close_all(api::shutdown_frame()).await;
    info!(
        "Closed {} streaming connection(s) ({} could not be notified)",
        report.delivered + report.failed,
        report.failed
    );
}
