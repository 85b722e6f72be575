//! Wallet routes.
//!
//! Handlers validate at the boundary and hand typed requests to the ledger
//! coordinator. Malformed input never reaches the coordinator and is
//! answered with 422.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tally_core::wallet::{validate_operation, validate_wallet_id};
use tally_shared::AppError;
use tally_shared::types::{PageRequest, WalletId};
use tracing::info;

use super::{app_error_response, wallet_error_response};
use crate::AppState;

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets", post(create_wallet))
        .route("/wallets/", post(create_wallet))
        .route("/wallets/{wallet_id}", get(get_wallet))
        .route("/wallets/{wallet_id}/operation", post(perform_operation))
        .route("/wallets/{wallet_id}/transactions", get(list_transactions))
        .route("/wallets/{wallet_id}/reconciliation", get(reconcile))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a wallet.
#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    /// Caller-chosen wallet id.
    pub id: String,
}

/// Request body for a deposit or withdrawal.
#[derive(Debug, Deserialize)]
pub struct OperationBody {
    /// `DEPOSIT` or `WITHDRAW`.
    pub operation_type: String,
    /// Positive amount with at most two decimal places. JSON numbers are
    /// read from their literal text, never through a float.
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub amount: Decimal,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/wallets` - Create a wallet with a zero balance.
async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return validation_response(&rejection.body_text()),
    };

    let id = match validate_wallet_id(&payload.id) {
        Ok(id) => id,
        Err(e) => return wallet_error_response(&e),
    };

    match state.ledger.create_wallet(id).await {
        Ok(wallet) => (StatusCode::OK, Json(wallet)).into_response(),
        Err(e) => wallet_error_response(&e),
    }
}

/// GET `/wallets/{wallet_id}` - Read a wallet's balance.
async fn get_wallet(State(state): State<AppState>, Path(wallet_id): Path<String>) -> Response {
    let id = match path_wallet_id(&wallet_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.ledger.get_wallet(&id).await {
        Ok(wallet) => (StatusCode::OK, Json(wallet)).into_response(),
        Err(e) => wallet_error_response(&e),
    }
}

/// POST `/wallets/{wallet_id}/operation` - Deposit into or withdraw from a wallet.
async fn perform_operation(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    payload: Result<Json<OperationBody>, JsonRejection>,
) -> Response {
    let id = match path_wallet_id(&wallet_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return validation_response(&rejection.body_text()),
    };

    let request = match validate_operation(&payload.operation_type, payload.amount) {
        Ok(request) => request,
        Err(e) => return wallet_error_response(&e),
    };

    match state.ledger.perform_operation(&id, &request).await {
        Ok(transaction) => {
            info!(
                wallet_id = %id,
                transaction_id = %transaction.id,
                "Operation completed"
            );
            (StatusCode::OK, Json(transaction)).into_response()
        }
        Err(e) => wallet_error_response(&e),
    }
}

/// GET `/wallets/{wallet_id}/transactions` - List a wallet's transactions in insertion order.
async fn list_transactions(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Response {
    let id = match path_wallet_id(&wallet_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Query(page) = match query {
        Ok(query) => query,
        Err(rejection) => return validation_response(&rejection.body_text()),
    };

    match state.ledger.list_transactions(&id, &page).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => wallet_error_response(&e),
    }
}

/// GET `/wallets/{wallet_id}/reconciliation` - Compare the balance with its replayed log.
async fn reconcile(State(state): State<AppState>, Path(wallet_id): Path<String>) -> Response {
    let id = match path_wallet_id(&wallet_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.ledger.reconcile(&id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => wallet_error_response(&e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// A path id that cannot be a valid wallet id names no wallet.
fn path_wallet_id(raw: &str) -> Result<WalletId, Response> {
    WalletId::parse(raw).map_err(|_| {
        app_error_response(&AppError::NotFound(format!("Wallet not found: {raw}")))
    })
}

fn validation_response(message: &str) -> Response {
    app_error_response(&AppError::Validation(message.to_string()))
}
