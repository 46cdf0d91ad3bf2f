//! The transfer engine: one call moves funds between two wallets and appends a log entry inside
//! a single unit of work, or changes nothing.

use tracing::{debug, info, warn};

use crate::error::LedgerError;
use crate::models::Transaction;
use crate::storage::{LedgerStore, UnitOfWork};

/// Moves `amount` minor units from `from` to `to`.
///
/// Both rows are locked in ascending address order so that transfers running in opposite
/// directions over the same pair cannot deadlock. A missing sender is reported before a missing
/// receiver no matter which of the two was locked first.
pub async fn transfer(
    store: &dyn LedgerStore,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<Transaction, LedgerError> {
    if amount <= 0 {
        return Err(LedgerError::InvalidAmount);
    }
    if from == to {
        return Err(LedgerError::SelfTransfer);
    }

    let mut uow = store.begin().await?;

    match apply(uow.as_mut(), from, to, amount).await {
        Ok(transaction) => {
            uow.commit().await?;
            info!(
                id = transaction.id,
                from = %from,
                to = %to,
                amount,
                "Transfer committed"
            );
            Ok(transaction)
        }
        Err(e) => {
            if let Err(rollback_err) = uow.rollback().await {
                warn!("Rollback after failed transfer also failed: {}", rollback_err);
            }
            if e.is_domain() {
                debug!(from = %from, to = %to, amount, "Transfer rejected: {}", e);
            } else {
                tracing::error!(from = %from, to = %to, amount, "Transfer failed: {}", e);
            }
            Err(e)
        }
    }
}

async fn apply(
    uow: &mut dyn UnitOfWork,
    from: &str,
    to: &str,
    amount: i64,
) -> Result<Transaction, LedgerError> {
    let (first, second) = if from < to { (from, to) } else { (to, from) };
    let first_row = uow.lock_wallet(first).await?;
    let second_row = uow.lock_wallet(second).await?;
    let (sender, receiver) = if first == from {
        (first_row, second_row)
    } else {
        (second_row, first_row)
    };

    if sender.is_none() {
        return Err(LedgerError::SenderNotFound);
    }
    if receiver.is_none() {
        return Err(LedgerError::ReceiverNotFound);
    }

    // The balance check happens in the update itself, not against the value read above.
    if !uow.debit_if_sufficient(from, amount).await? {
        return Err(LedgerError::NotEnoughMoney);
    }
    uow.credit(to, amount).await?;

    let transaction = uow.append_transaction(from, to, amount).await?;
    Ok(transaction)
}
