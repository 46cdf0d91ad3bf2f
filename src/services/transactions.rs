use crate::error::LedgerError;
use crate::models::Transaction;
use crate::storage::LedgerStore;

/// The `count` most recent log entries, newest first. `count` must already be positive; the
/// request layer rejects anything else.
pub async fn recent_transactions(
    store: &dyn LedgerStore,
    count: i64,
) -> Result<Vec<Transaction>, LedgerError> {
    Ok(store.recent_transactions(count).await?)
}
