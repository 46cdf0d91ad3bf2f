use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{bad_request, ledger_error_response, ErrorResponse};
use crate::error::LedgerError;
use crate::models::{to_minor_units, Transaction};
use crate::services;
use crate::AppState;

#[derive(Deserialize)]
pub struct SendRequest {
    pub from: String,
    pub to: String,
    /// Display units, e.g. 33.3 means 3330 minor units.
    pub amount: f64,
}

#[derive(Serialize, Deserialize)]
pub struct SendResponse {
    pub status: String,
    pub transaction: Transaction,
}

#[derive(Deserialize)]
pub struct RecentTransactionsQuery {
    pub count: Option<String>,
}

/// POST /api/send
pub async fn send_transaction(
    State(state): State<AppState>,
    payload: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<SendResponse>, ErrorResponse> {
    let Json(payload) = payload.map_err(|e| bad_request(e.body_text()))?;

    let amount = to_minor_units(payload.amount)
        .ok_or_else(|| ledger_error_response(&LedgerError::InvalidAmount))?;

    let transaction = services::transfer(state.store.as_ref(), &payload.from, &payload.to, amount)
        .await
        .map_err(|e| ledger_error_response(&e))?;

    Ok(Json(SendResponse {
        status: "sent".to_string(),
        transaction,
    }))
}

/// GET /api/transactions?count=N
pub async fn get_recent_transactions(
    State(state): State<AppState>,
    Query(query): Query<RecentTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, ErrorResponse> {
    let raw = query
        .count
        .ok_or_else(|| bad_request("count query parameter is required"))?;
    let count: i64 = raw
        .trim()
        .parse()
        .map_err(|_| bad_request(format!("Invalid count value: {}", raw)))?;
    if count <= 0 {
        return Err(bad_request("Invalid count value"));
    }

    let transactions = services::recent_transactions(state.store.as_ref(), count)
        .await
        .map_err(|e| ledger_error_response(&e))?;

    Ok(Json(transactions))
}
