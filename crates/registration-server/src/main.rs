//! Registration server - Entry point.

use registration_server::{
    api::{create_router, AppState},
    auth::AdminAuth,
    config::Config,
};
use registration_store::{RecordStore, Store};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting registration server");

    // Initialize storage
    let backend = if config.storage.persist {
        Store::file(
            config.storage.path.clone(),
            config.storage.encryption_key.as_ref(),
        )
    } else {
        info!("Persistence disabled, using in-memory storage");
        Store::memory()
    };

    let store = match RecordStore::open(backend).await {
        Ok(s) => {
            info!("Loaded {} registrations", s.count_all().await);
            s
        }
        Err(e) => {
            error!("Failed to load registrations: {}", e);
            std::process::exit(1);
        }
    };

    let auth = AdminAuth::new(
        config.admin.username.clone(),
        &config.admin.password,
        &config.auth.jwt_secret,
        config.auth.token_ttl(),
    );

    // Create application state
    let state = AppState::new(store, auth);
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Run server
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
