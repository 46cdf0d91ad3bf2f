use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{ledger_error_response, ErrorResponse};
use crate::models::from_minor_units;
use crate::services;
use crate::AppState;

#[derive(Serialize, Deserialize)]
pub struct BalanceResponse {
    pub address: String,
    /// Display units.
    pub balance: f64,
}

/// GET /api/wallet/:address/balance
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ErrorResponse> {
    let balance = services::get_balance(state.store.as_ref(), &address)
        .await
        .map_err(|e| ledger_error_response(&e))?;

    Ok(Json(BalanceResponse {
        address,
        balance: from_minor_units(balance),
    }))
}
