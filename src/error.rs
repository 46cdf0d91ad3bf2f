//! Error kinds surfaced by the ledger core.
//! Domain errors abort the unit of work they were raised in; storage errors are infrastructure
//! failures and stay distinct from them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unit of work tried to write a row it never locked.
    #[error("wallet {0} is not locked in this unit of work")]
    NotLocked(String),

    #[error("balance overflow on wallet {0}")]
    Overflow(String),
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid amount")]
    InvalidAmount,

    #[error("self transfer")]
    SelfTransfer,

    #[error("sender not found")]
    SenderNotFound,

    #[error("receiver not found")]
    ReceiverNotFound,

    #[error("not enough money")]
    NotEnoughMoney,

    #[error("wallet not found")]
    WalletNotFound,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::Storage(StorageError::Database(e))
    }
}

impl LedgerError {
    /// Stable machine-readable code used in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount => "INVALID_AMOUNT",
            LedgerError::SelfTransfer => "SELF_TRANSFER",
            LedgerError::SenderNotFound => "SENDER_NOT_FOUND",
            LedgerError::ReceiverNotFound => "RECEIVER_NOT_FOUND",
            LedgerError::NotEnoughMoney => "NOT_ENOUGH_MONEY",
            LedgerError::WalletNotFound => "WALLET_NOT_FOUND",
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }

    pub fn is_domain(&self) -> bool {
        !matches!(self, LedgerError::Storage(_))
    }
}
