use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One per-reference settlement event. `id` is the human-facing "TR001"
/// sequence, not a uuid; once `status` is true the row is never mutated.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Transaction {
    pub id: String,
    pub total_reference_count: i32,
    pub total_reference_amount: BigDecimal,
    pub user_id: Uuid,
    pub reference_code: String,
    pub discount_amount: BigDecimal,
    pub received_amount: BigDecimal,
    pub receipt_url: String,
    pub status: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct TransactionDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}

/// A platform-wide payout splitting funds between the two stakeholders.
/// Amounts are recorded as supplied by the caller after external
/// reconciliation; they are not recomputed from user rows.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct SharedTransaction {
    pub id: Uuid,
    pub user_count: i32,
    pub full_amount: BigDecimal,
    pub kowida_fund: BigDecimal,
    pub randyll_fund: BigDecimal,
    pub receipt_url: String,
    pub status: bool,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
}
