use crate::error::StorageError;
use crate::models::Wallet;
use crate::storage::LedgerStore;

/// Creates `count` wallets holding `initial_balance` minor units each, but only when the store
/// has no wallets yet. Returns how many were created.
pub async fn seed_wallets(
    store: &dyn LedgerStore,
    count: usize,
    initial_balance: i64,
) -> Result<u64, StorageError> {
    let existing = store.wallet_count().await?;
    if existing > 0 {
        tracing::info!("Database already has {} wallets, skipping seed", existing);
        return Ok(0);
    }

    tracing::info!("Creating {} wallets with balance {}...", count, initial_balance);

    let wallets: Vec<Wallet> = (0..count)
        .map(|_| Wallet::with_balance(initial_balance))
        .collect();

    // The store re-checks emptiness under its own lock; another process may have seeded since.
    let created = store.seed_wallets(&wallets).await?;
    if created == 0 {
        tracing::info!("Wallets were seeded concurrently, nothing created");
    } else {
        tracing::info!("Seeded {} wallets", created);
    }

    Ok(created)
}
