//! HTTP API for the registration server.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, require_admin};
pub use types::*;

use crate::auth::AdminAuth;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use registration_store::RecordStore;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Registration records
    pub store: Arc<RecordStore>,
    /// Admin credential check and token verification
    pub auth: Arc<AdminAuth>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: RecordStore, auth: AdminAuth) -> Self {
        Self {
            store: Arc::new(store),
            auth: Arc::new(auth),
        }
    }
}

/// Create the API router.
///
/// Unknown paths and known paths hit with the wrong method both answer
/// with the same JSON 404.
pub fn create_router(state: AppState) -> Router {
    // Every route here is rejected before its handler runs unless the
    // request carries a valid admin token.
    let admin = Router::new()
        .route(
            "/api/admin/verify",
            get(handlers::verify_admin).fallback(handlers::not_found),
        )
        .route(
            "/api/queries",
            get(handlers::list_queries).fallback(handlers::not_found),
        )
        .route(
            "/api/queries/:id",
            delete(handlers::delete_query).fallback(handlers::not_found),
        )
        .route(
            "/api/queries/export/csv",
            get(handlers::export_csv).fallback(handlers::not_found),
        )
        .route(
            "/api/stats",
            get(handlers::stats).fallback(handlers::not_found),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_admin,
        ));

    Router::new()
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route(
            "/api/submit-query",
            post(handlers::submit_query).fallback(handlers::not_found),
        )
        .route(
            "/api/admin/login",
            post(handlers::login).fallback(handlers::not_found),
        )
        .merge(admin)
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
