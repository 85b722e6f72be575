//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for wallets and their transactions
//! - Health and liveness endpoints
//! - Mapping of ledger errors to HTTP responses

pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tally_db::{LedgerCoordinator, LedgerSettings};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Coordinator for every wallet read and write.
    pub ledger: Arc<LedgerCoordinator>,
}

impl AppState {
    /// Builds the state from a connection pool and ledger settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: LedgerSettings) -> Self {
        Self {
            ledger: Arc::new(LedgerCoordinator::new(db, settings)),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
