//! Ledger rows and boundary conversions. Amounts are always i64 minor units inside the crate.

pub mod address;
pub mod money;
pub mod transaction;
pub mod wallet;

pub use address::generate_wallet_address;
pub use money::{from_minor_units, to_minor_units, MINOR_UNITS_PER_UNIT};
pub use transaction::Transaction;
pub use wallet::Wallet;
