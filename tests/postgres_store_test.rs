// PostgreSQL backend tests. They need a running database at TEST_DATABASE_URL:
//   cargo test --test postgres_store_test -- --ignored --test-threads=1

use std::sync::Arc;
use std::time::Duration;

use wallet_ledger::services::{get_balance, recent_transactions, seed_wallets, transfer};
use wallet_ledger::storage::{LedgerStore, UnitOfWork};
use wallet_ledger::LedgerError;

use test_helpers::*;

#[tokio::test]
#[ignore] // Ignore by default - requires test database
async fn test_pg_transfer_commits_balances_and_log() {
    let store = setup_pg_store().await;
    insert_pg_wallet(&store, "w1", 10_000).await;
    insert_pg_wallet(&store, "w2", 10_000).await;

    let transaction = transfer(&store, "w1", "w2", 5_000).await.unwrap();

    assert_eq!(get_balance(&store, "w1").await.unwrap(), 5_000);
    assert_eq!(get_balance(&store, "w2").await.unwrap(), 15_000);
    let recent = recent_transactions(&store, 10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, transaction.id);
    assert_eq!(recent[0].amount, 5_000);
}

#[tokio::test]
#[ignore]
async fn test_pg_failed_transfers_change_nothing() {
    let store = setup_pg_store().await;
    insert_pg_wallet(&store, "w1", 100).await;
    insert_pg_wallet(&store, "w2", 0).await;

    let err = transfer(&store, "w1", "w2", 101).await.unwrap_err();
    assert!(matches!(err, LedgerError::NotEnoughMoney));
    let err = transfer(&store, "ghost", "w2", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::SenderNotFound));
    let err = transfer(&store, "w1", "ghost", 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::ReceiverNotFound));

    assert_eq!(get_balance(&store, "w1").await.unwrap(), 100);
    assert_eq!(get_balance(&store, "w2").await.unwrap(), 0);
    assert!(recent_transactions(&store, 10).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_pg_uncommitted_unit_of_work_is_rolled_back_on_drop() {
    let store = setup_pg_store().await;
    insert_pg_wallet(&store, "w1", 100).await;
    insert_pg_wallet(&store, "w2", 0).await;

    {
        let mut uow = store.begin().await.unwrap();
        uow.lock_wallet("w1").await.unwrap();
        uow.lock_wallet("w2").await.unwrap();
        assert!(uow.debit_if_sufficient("w1", 100).await.unwrap());
        uow.credit("w2", 100).await.unwrap();
        uow.append_transaction("w1", "w2", 100).await.unwrap();
    }

    assert_eq!(get_balance(&store, "w1").await.unwrap(), 100);
    assert!(recent_transactions(&store, 10).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_pg_conditional_debit_refuses_overdraft() {
    let store = setup_pg_store().await;
    insert_pg_wallet(&store, "w1", 50).await;

    let mut uow = store.begin().await.unwrap();
    uow.lock_wallet("w1").await.unwrap();
    assert!(!uow.debit_if_sufficient("w1", 51).await.unwrap());
    assert!(uow.debit_if_sufficient("w1", 50).await.unwrap());
    uow.rollback().await.unwrap();

    assert_eq!(get_balance(&store, "w1").await.unwrap(), 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_pg_concurrent_spend_succeeds_once() {
    let store = Arc::new(setup_pg_store().await);
    insert_pg_wallet(&store, "a", 5_000).await;
    insert_pg_wallet(&store, "b", 0).await;
    insert_pg_wallet(&store, "c", 0).await;

    let to_b = {
        let store = store.clone();
        tokio::spawn(async move { transfer(&*store, "a", "b", 5_000).await })
    };
    let to_c = {
        let store = store.clone();
        tokio::spawn(async move { transfer(&*store, "a", "c", 5_000).await })
    };
    let results = [to_b.await.unwrap(), to_c.await.unwrap()];

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(LedgerError::NotEnoughMoney)))
            .count(),
        1
    );
    assert_eq!(get_balance(&*store, "a").await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_pg_opposite_direction_transfers_do_not_deadlock() {
    let store = Arc::new(setup_pg_store().await);
    insert_pg_wallet(&store, "alice", 10_000).await;
    insert_pg_wallet(&store, "bob", 10_000).await;

    let mut handles = Vec::new();
    for i in 0..40 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                transfer(&*store, "alice", "bob", 3).await
            } else {
                transfer(&*store, "bob", "alice", 3).await
            }
        }));
    }

    let results = tokio::time::timeout(Duration::from_secs(60), futures::future::join_all(handles))
        .await
        .expect("transfers deadlocked");
    for result in results {
        result.unwrap().unwrap();
    }

    assert_eq!(get_balance(&*store, "alice").await.unwrap(), 10_000);
    assert_eq!(get_balance(&*store, "bob").await.unwrap(), 10_000);
}

#[tokio::test]
#[ignore]
async fn test_pg_seed_is_idempotent() {
    let store = setup_pg_store().await;

    assert_eq!(seed_wallets(&store, 10, 10_000).await.unwrap(), 10);
    assert_eq!(seed_wallets(&store, 10, 10_000).await.unwrap(), 0);
    assert_eq!(store.wallet_count().await.unwrap(), 10);
}
