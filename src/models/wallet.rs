use serde::{Deserialize, Serialize};

use super::address::generate_wallet_address;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Wallet {
    pub address: String,
    /// Minor units, never negative.
    pub balance: i64,
}

impl Wallet {
    /// A wallet with a freshly generated address.
    pub fn with_balance(balance: i64) -> Self {
        Self {
            address: generate_wallet_address(),
            balance,
        }
    }
}
