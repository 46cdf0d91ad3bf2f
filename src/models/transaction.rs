use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed transfer. Rows are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    #[sqlx(rename = "from_address")]
    pub from: String,
    #[sqlx(rename = "to_address")]
    pub to: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
