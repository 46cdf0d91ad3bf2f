//! Ledger operations. Every function takes the store explicitly; nothing here keeps state.

pub mod seed_data;
pub mod transactions;
pub mod transfer;
pub mod wallet;

pub use seed_data::seed_wallets;
pub use transactions::recent_transactions;
pub use transfer::transfer;
pub use wallet::get_balance;
