use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A referral code owned by a referer. The commission parameters are fixed
/// at creation time and copied onto every settlement made under this code.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Reference {
    pub id: Uuid,
    pub code: String,
    pub phone: String,
    pub discount_amount: BigDecimal,
    pub received_amount: BigDecimal,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReferenceStats {
    pub code: String,
    pub total_registered: i64,
    pub pending_settlement: i64,
    pub settled: i64,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct BaseAmount {
    pub id: Uuid,
    pub amount: BigDecimal,
    pub updated_at: DateTime<Utc>,
}
