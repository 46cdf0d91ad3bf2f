//! In-process backend with the same locking contract as PostgreSQL.
//!
//! Each wallet has its own async mutex standing in for the row lock. A unit of work stages the
//! balances of the rows it holds plus the log entries it appended, and publishes all of them
//! under one state lock on commit. Dropping the unit of work releases the row locks and throws
//! the staged writes away.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::OwnedMutexGuard;

use super::{LedgerStore, StorageResult, UnitOfWork};
use crate::error::StorageError;
use crate::models::{Transaction, Wallet};

#[derive(Default)]
struct State {
    wallets: BTreeMap<String, i64>,
    transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    row_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    next_id: AtomicI64,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn row_lock(&self, address: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.row_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(address.to_string()).or_default().clone()
    }
}

#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    inner: Arc<Inner>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store that already holds `wallets`, bypassing the empty-table check of
    /// [`LedgerStore::seed_wallets`].
    pub fn with_wallets<I>(wallets: I) -> Self
    where
        I: IntoIterator<Item = Wallet>,
    {
        let store = Self::new();
        {
            let mut state = store.inner.state();
            for wallet in wallets {
                state.wallets.insert(wallet.address, wallet.balance);
            }
        }
        store
    }

    /// Sum of all balances. Lets tests check conservation without walking every wallet.
    pub fn total_balance(&self) -> i64 {
        self.inner.state().wallets.values().sum()
    }

    pub fn transaction_count(&self) -> usize {
        self.inner.state().transactions.len()
    }
}

struct LockedRow {
    balance: i64,
    _guard: OwnedMutexGuard<()>,
}

pub struct MemoryUnitOfWork {
    inner: Arc<Inner>,
    locked: HashMap<String, LockedRow>,
    appended: Vec<Transaction>,
}

impl MemoryUnitOfWork {
    fn locked_row(&mut self, address: &str) -> StorageResult<&mut LockedRow> {
        self.locked
            .get_mut(address)
            .ok_or_else(|| StorageError::NotLocked(address.to_string()))
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork {
            inner: self.inner.clone(),
            locked: HashMap::new(),
            appended: Vec::new(),
        }))
    }

    async fn wallet_balance(&self, address: &str) -> StorageResult<Option<i64>> {
        Ok(self.inner.state().wallets.get(address).copied())
    }

    async fn recent_transactions(&self, limit: i64) -> StorageResult<Vec<Transaction>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let mut transactions = self.inner.state().transactions.clone();
        transactions.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        transactions.truncate(limit);
        Ok(transactions)
    }

    async fn wallet_count(&self) -> StorageResult<i64> {
        Ok(self.inner.state().wallets.len() as i64)
    }

    async fn seed_wallets(&self, wallets: &[Wallet]) -> StorageResult<u64> {
        let mut state = self.inner.state();
        if !state.wallets.is_empty() {
            return Ok(0);
        }
        let mut created = 0;
        for wallet in wallets {
            if state
                .wallets
                .insert(wallet.address.clone(), wallet.balance)
                .is_none()
            {
                created += 1;
            }
        }
        Ok(created)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_wallet(&mut self, address: &str) -> StorageResult<Option<Wallet>> {
        if let Some(row) = self.locked.get(address) {
            return Ok(Some(Wallet {
                address: address.to_string(),
                balance: row.balance,
            }));
        }

        if !self.inner.state().wallets.contains_key(address) {
            return Ok(None);
        }

        let guard = self.inner.row_lock(address).lock_owned().await;

        // Re-read after the lock: the previous holder may have committed a new balance.
        let Some(balance) = self.inner.state().wallets.get(address).copied() else {
            return Ok(None);
        };

        self.locked.insert(
            address.to_string(),
            LockedRow {
                balance,
                _guard: guard,
            },
        );
        Ok(Some(Wallet {
            address: address.to_string(),
            balance,
        }))
    }

    async fn debit_if_sufficient(&mut self, address: &str, amount: i64) -> StorageResult<bool> {
        let row = self.locked_row(address)?;
        if row.balance < amount {
            return Ok(false);
        }
        row.balance -= amount;
        Ok(true)
    }

    async fn credit(&mut self, address: &str, amount: i64) -> StorageResult<()> {
        let row = self.locked_row(address)?;
        row.balance = row
            .balance
            .checked_add(amount)
            .ok_or_else(|| StorageError::Overflow(address.to_string()))?;
        Ok(())
    }

    async fn append_transaction(
        &mut self,
        from: &str,
        to: &str,
        amount: i64,
    ) -> StorageResult<Transaction> {
        let transaction = Transaction {
            id: self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            from: from.to_string(),
            to: to.to_string(),
            amount,
            created_at: Utc::now(),
        };
        self.appended.push(transaction.clone());
        Ok(transaction)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        let MemoryUnitOfWork {
            inner,
            locked,
            appended,
        } = *self;
        {
            let mut state = inner.state();
            for (address, row) in &locked {
                state.wallets.insert(address.clone(), row.balance);
            }
            state.transactions.extend(appended);
        }
        // Row locks go last, after the new balances are visible.
        drop(locked);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        Ok(())
    }
}
