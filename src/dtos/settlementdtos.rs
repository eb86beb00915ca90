use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::transactionmodel::{SharedTransaction, Transaction};
use crate::utils::decimal::BigDecimalHelpers;

/// Multipart settlement request after field extraction. The receipt file is
/// carried separately as a `ReceiptFile`.
#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SettleReferenceDto {
    #[validate(length(min = 1, message = "Reference code is required"))]
    pub reference_code: String,

    pub referrer_user_id: Uuid,

    #[validate(range(min = 0.0, message = "Total reference amount cannot be negative"))]
    pub total_reference_amount: f64,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SettleSharedDto {
    #[validate(range(min = 0, message = "User count cannot be negative"))]
    pub user_count: i32,

    #[validate(range(min = 0.0, message = "Full amount cannot be negative"))]
    pub full_amount: f64,

    #[validate(range(min = 0.0, message = "Kowida fund cannot be negative"))]
    pub kowida_fund: f64,

    #[validate(range(min = 0.0, message = "Randyll fund cannot be negative"))]
    pub randyll_fund: f64,

    pub remark: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SettlementResponseDto {
    pub status: String,
    pub transaction_id: String,
    pub total_reference_count: i32,
    pub total_reference_amount: f64,
    pub discount_amount: f64,
    pub received_amount: f64,
    pub settled: bool,
}

impl SettlementResponseDto {
    /// Echoes the persisted row, not the request, so the client sees exactly
    /// what was committed.
    pub fn from_transaction(transaction: &Transaction) -> Self {
        SettlementResponseDto {
            status: "success".to_string(),
            transaction_id: transaction.id.to_owned(),
            total_reference_count: transaction.total_reference_count,
            total_reference_amount: transaction.total_reference_amount.round2().to_f64_or_zero(),
            discount_amount: transaction.discount_amount.round2().to_f64_or_zero(),
            received_amount: transaction.received_amount.round2().to_f64_or_zero(),
            settled: transaction.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SharedSettlementResponseDto {
    pub status: String,
    pub transaction_id: String,
    pub users_updated: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterTransactionDto {
    pub id: String,
    pub total_reference_count: i32,
    pub total_reference_amount: f64,
    pub user_id: String,
    pub reference_code: String,
    pub discount_amount: f64,
    pub received_amount: f64,
    pub receipt_url: String,
    pub settled: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterTransactionDto {
    pub fn filter_transaction(transaction: &Transaction) -> Self {
        FilterTransactionDto {
            id: transaction.id.to_owned(),
            total_reference_count: transaction.total_reference_count,
            total_reference_amount: transaction.total_reference_amount.round2().to_f64_or_zero(),
            user_id: transaction.user_id.to_string(),
            reference_code: transaction.reference_code.to_owned(),
            discount_amount: transaction.discount_amount.round2().to_f64_or_zero(),
            received_amount: transaction.received_amount.round2().to_f64_or_zero(),
            receipt_url: transaction.receipt_url.to_owned(),
            settled: transaction.status,
            created_at: transaction.created_at,
        }
    }

    pub fn filter_transactions(transactions: &[Transaction]) -> Vec<FilterTransactionDto> {
        transactions.iter().map(Self::filter_transaction).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterSharedTransactionDto {
    pub id: String,
    pub user_count: i32,
    pub full_amount: f64,
    pub kowida_fund: f64,
    pub randyll_fund: f64,
    pub receipt_url: String,
    pub settled: bool,
    pub remark: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl FilterSharedTransactionDto {
    pub fn filter_shared_transaction(transaction: &SharedTransaction) -> Self {
        FilterSharedTransactionDto {
            id: transaction.id.to_string(),
            user_count: transaction.user_count,
            full_amount: transaction.full_amount.round2().to_f64_or_zero(),
            kowida_fund: transaction.kowida_fund.round2().to_f64_or_zero(),
            randyll_fund: transaction.randyll_fund.round2().to_f64_or_zero(),
            receipt_url: transaction.receipt_url.to_owned(),
            settled: transaction.status,
            remark: transaction.remark.clone(),
            created_at: transaction.created_at,
        }
    }

    pub fn filter_shared_transactions(
        transactions: &[SharedTransaction],
    ) -> Vec<FilterSharedTransactionDto> {
        transactions
            .iter()
            .map(Self::filter_shared_transaction)
            .collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponseDto {
    pub status: String,
    pub transactions: Vec<FilterTransactionDto>,
    pub results: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SharedTransactionListResponseDto {
    pub status: String,
    pub transactions: Vec<FilterSharedTransactionDto>,
    pub results: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn sample_transaction() -> Transaction {
        Transaction {
            id: "TR007".to_string(),
            total_reference_count: 3,
            total_reference_amount: BigDecimal::from_str("600.005").unwrap(),
            user_id: Uuid::new_v4(),
            reference_code: "SL002".to_string(),
            discount_amount: BigDecimal::from_str("500").unwrap(),
            received_amount: BigDecimal::from_str("1500").unwrap(),
            receipt_url: "https://store.example/receipt-1.png".to_string(),
            status: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_settlement_response_echoes_persisted_row() {
        let transaction = sample_transaction();
        let dto = SettlementResponseDto::from_transaction(&transaction);

        assert_eq!(dto.transaction_id, "TR007");
        assert_eq!(dto.total_reference_count, 3);
        assert!(dto.settled);
    }

    #[test]
    fn test_amounts_are_rounded_at_presentation() {
        let transaction = sample_transaction();
        let dto = SettlementResponseDto::from_transaction(&transaction);

        // 600.005 rounds half-up to 600.01 only when leaving the system.
        assert_eq!(dto.total_reference_amount, 600.01);
        assert_eq!(dto.discount_amount, 500.00);
    }

    #[test]
    fn test_settle_shared_dto_rejects_negative_funds() {
        let dto = SettleSharedDto {
            user_count: 10,
            full_amount: 1000.0,
            kowida_fund: -600.0,
            randyll_fund: 400.0,
            remark: None,
        };
        assert!(dto.validate().is_err());
    }
}
