//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::wallet::WalletError;
use tally_shared::AppError;
use tracing::error;

use crate::AppState;

pub mod health;
pub mod wallets;

/// Creates the versioned API router.
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(wallets::routes())
}

/// Renders a ledger error as `{"error", "message"}` with its status code.
pub(crate) fn wallet_error_response(err: &WalletError) -> Response {
    if matches!(err, WalletError::OperationFailed(_)) {
        error!(error = %err, "Wallet operation failed");
    }
    error_response(err.http_status_code(), err.error_code(), &err.to_string())
}

/// Renders an application error as `{"error", "message"}` with its status code.
pub(crate) fn app_error_response(err: &AppError) -> Response {
    if err.is_server_error() {
        error!(error = %err, "Request failed");
    }
    error_response(err.status_code(), err.error_code(), &err.to_string())
}

fn error_response(status: u16, code: &str, message: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}
