//! PostgreSQL backend. Row locks are `SELECT ... FOR UPDATE`; a unit of work is one sqlx
//! transaction, rolled back by sqlx if it is dropped before commit.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use super::{LedgerStore, StorageResult, UnitOfWork};
use crate::database::DatabasePool;
use crate::models::{Transaction, Wallet};

#[derive(Clone)]
pub struct PgLedgerStore {
    pool: DatabasePool,
}

impl PgLedgerStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub struct PgUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> StorageResult<Box<dyn UnitOfWork>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }

    async fn wallet_balance(&self, address: &str) -> StorageResult<Option<i64>> {
        let balance = sqlx::query_scalar::<_, i64>("SELECT balance FROM wallets WHERE address = $1")
            .bind(address)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(balance)
    }

    async fn recent_transactions(&self, limit: i64) -> StorageResult<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, from_address, to_address, amount, created_at
            FROM transactions
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await?;
        Ok(transactions)
    }

    async fn wallet_count(&self) -> StorageResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wallets")
            .fetch_one(&*self.pool)
            .await?;
        Ok(count)
    }

    async fn seed_wallets(&self, wallets: &[Wallet]) -> StorageResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent seeders; plain row inserts from other sessions still block.
        sqlx::query("LOCK TABLE wallets IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM wallets")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            tx.rollback().await?;
            return Ok(0);
        }

        let mut created = 0;
        for wallet in wallets {
            created += sqlx::query("INSERT INTO wallets (address, balance) VALUES ($1, $2)")
                .bind(&wallet.address)
                .bind(wallet.balance)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;
        Ok(created)
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_wallet(&mut self, address: &str) -> StorageResult<Option<Wallet>> {
        let wallet = sqlx::query_as::<_, Wallet>(
            "SELECT address, balance FROM wallets WHERE address = $1 FOR UPDATE",
        )
        .bind(address)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(wallet)
    }

    async fn debit_if_sufficient(&mut self, address: &str, amount: i64) -> StorageResult<bool> {
        let result = sqlx::query(
            "UPDATE wallets SET balance = balance - $1 WHERE address = $2 AND balance >= $1",
        )
        .bind(amount)
        .bind(address)
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn credit(&mut self, address: &str, amount: i64) -> StorageResult<()> {
        sqlx::query("UPDATE wallets SET balance = balance + $1 WHERE address = $2")
            .bind(amount)
            .bind(address)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn append_transaction(
        &mut self,
        from: &str,
        to: &str,
        amount: i64,
    ) -> StorageResult<Transaction> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (from_address, to_address, amount)
            VALUES ($1, $2, $3)
            RETURNING id, from_address, to_address, amount, created_at
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(amount)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(transaction)
    }

    async fn commit(self: Box<Self>) -> StorageResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StorageResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
