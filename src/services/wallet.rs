use crate::error::LedgerError;
use crate::storage::LedgerStore;

/// Current balance of `address` in minor units. Unlocked read.
pub async fn get_balance(store: &dyn LedgerStore, address: &str) -> Result<i64, LedgerError> {
    store
        .wallet_balance(address)
        .await?
        .ok_or(LedgerError::WalletNotFound)
}
