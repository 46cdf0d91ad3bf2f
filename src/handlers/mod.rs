pub mod transactions;
pub mod wallets;

use axum::{http::StatusCode, response::Json};

use crate::error::LedgerError;

pub use transactions::{
    get_recent_transactions,
    send_transaction,
    RecentTransactionsQuery,
    SendRequest,
    SendResponse,
};
pub use wallets::{get_balance, BalanceResponse};

pub type ErrorResponse = (StatusCode, Json<serde_json::Value>);

pub fn bad_request(message: impl Into<String>) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": message.into(), "code": "BAD_REQUEST"})),
    )
}

/// Domain errors keep their message; storage errors are logged and replaced by a generic one.
pub fn ledger_error_response(err: &LedgerError) -> ErrorResponse {
    let status = match err {
        LedgerError::InvalidAmount | LedgerError::SelfTransfer | LedgerError::NotEnoughMoney => {
            StatusCode::BAD_REQUEST
        }
        LedgerError::SenderNotFound | LedgerError::ReceiverNotFound | LedgerError::WalletNotFound => {
            StatusCode::NOT_FOUND
        }
        LedgerError::Storage(e) => {
            tracing::error!("Storage error: {:?}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Database error", "code": err.code()})),
            );
        }
    };

    (
        status,
        Json(serde_json::json!({"error": err.to_string(), "code": err.code()})),
    )
}
