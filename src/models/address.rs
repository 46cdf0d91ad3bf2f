//! Wallet addresses: 64 lowercase hex chars, the SHA-256 digest of a random UUID v4.

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const ADDRESS_LEN: usize = 64;

pub fn generate_wallet_address() -> String {
    let seed = Uuid::new_v4().to_string();
    let digest = Sha256::digest(seed.as_bytes());
    format!("{:x}", digest)
}
