//! Storage contract the ledger core is written against.
//!
//! A [`LedgerStore`] hands out [`UnitOfWork`]s. Everything done through a unit of work becomes
//! visible to other callers only after [`UnitOfWork::commit`]; dropping it or calling
//! [`UnitOfWork::rollback`] discards every write. Rows must be locked with
//! [`UnitOfWork::lock_wallet`] before they are written, and locks are held until the unit of
//! work ends.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{Transaction, Wallet};

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>>;

    /// Unlocked point read.
    async fn wallet_balance(&self, address: &str) -> StorageResult<Option<i64>>;

    /// Newest first by `created_at`, ties broken by descending `id`.
    async fn recent_transactions(&self, limit: i64) -> StorageResult<Vec<Transaction>>;

    async fn wallet_count(&self) -> StorageResult<i64>;

    /// Inserts `wallets` only when no wallet exists yet. Returns how many rows were created.
    async fn seed_wallets(&self, wallets: &[Wallet]) -> StorageResult<u64>;
}

#[async_trait]
pub trait UnitOfWork: Send {
    /// Exclusive row lock (`SELECT ... FOR UPDATE`). `None` when the wallet does not exist.
    async fn lock_wallet(&mut self, address: &str) -> StorageResult<Option<Wallet>>;

    /// `balance -= amount` only if `balance >= amount`. Returns whether a row was updated.
    async fn debit_if_sufficient(&mut self, address: &str, amount: i64) -> StorageResult<bool>;

    async fn credit(&mut self, address: &str, amount: i64) -> StorageResult<()>;

    async fn append_transaction(
        &mut self,
        from: &str,
        to: &str,
        amount: i64,
    ) -> StorageResult<Transaction>;

    async fn commit(self: Box<Self>) -> StorageResult<()>;

    async fn rollback(self: Box<Self>) -> StorageResult<()>;
}
