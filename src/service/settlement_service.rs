// service/settlement_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{db::DBClient, settlementdb::SettlementExt},
    models::transactionmodel::{SharedTransaction, Transaction},
    service::{
        error::ServiceError,
        storage::{ReceiptFile, StorageService},
    },
};

/// Orchestrates settlements: uploads the receipt to object storage, then
/// hands the database layer one atomic settlement to execute. The upload is
/// deliberately done before the database transaction opens so a slow or
/// failing store never holds row locks.
#[derive(Debug, Clone)]
pub struct SettlementService {
    db_client: Arc<DBClient>,
    storage: Arc<StorageService>,
    commission_rate: BigDecimal,
}

impl SettlementService {
    pub fn new(db_client: Arc<DBClient>, storage: Arc<StorageService>, config: &Config) -> Self {
        Self {
            db_client,
            storage,
            commission_rate: config.commission_rate.clone(),
        }
    }

    pub fn commission_rate(&self) -> &BigDecimal {
        &self.commission_rate
    }

    pub async fn settle_reference(
        &self,
        reference_code: &str,
        referrer_user_id: Uuid,
        total_reference_amount: BigDecimal,
        receipt: Option<ReceiptFile>,
    ) -> Result<Transaction, ServiceError> {
        if total_reference_amount < BigDecimal::default() {
            return Err(ServiceError::Validation(
                "total_reference_amount cannot be negative".to_string(),
            ));
        }

        let receipt = receipt
            .filter(|file| !file.bytes.is_empty())
            .ok_or(ServiceError::ReceiptRequired)?;

        let receipt_url = self.storage.upload(&receipt).await?;

        let transaction = self
            .db_client
            .settle_reference(
                reference_code,
                referrer_user_id,
                total_reference_amount,
                &receipt_url,
            )
            .await?;

        tracing::info!(
            "settled reference {} for referrer {}: transaction {} covering {} users",
            reference_code,
            referrer_user_id,
            transaction.id,
            transaction.total_reference_count
        );

        Ok(transaction)
    }

    pub async fn settle_shared(
        &self,
        user_count: i32,
        full_amount: BigDecimal,
        kowida_fund: BigDecimal,
        randyll_fund: BigDecimal,
        remark: Option<String>,
        receipt: Option<ReceiptFile>,
    ) -> Result<(SharedTransaction, u64), ServiceError> {
        if user_count < 0 {
            return Err(ServiceError::Validation(
                "user_count cannot be negative".to_string(),
            ));
        }
        for (field, value) in [
            ("full_amount", &full_amount),
            ("kowida_fund", &kowida_fund),
            ("randyll_fund", &randyll_fund),
        ] {
            if *value < BigDecimal::default() {
                return Err(ServiceError::Validation(format!(
                    "{field} cannot be negative"
                )));
            }
        }

        let receipt = receipt
            .filter(|file| !file.bytes.is_empty())
            .ok_or(ServiceError::ReceiptRequired)?;

        let receipt_url = self.storage.upload(&receipt).await?;

        let (shared_transaction, users_updated) = self
            .db_client
            .settle_shared(
                user_count,
                full_amount,
                kowida_fund,
                randyll_fund,
                &receipt_url,
                remark,
            )
            .await?;

        // Totals are caller-asserted, not recomputed here; surface them so
        // reconciliation drift is visible in the logs.
        tracing::warn!(
            "shared settlement {} recorded full_amount={} (kowida={}, randyll={}) for declared {} users; {} users flipped",
            shared_transaction.id,
            shared_transaction.full_amount,
            shared_transaction.kowida_fund,
            shared_transaction.randyll_fund,
            shared_transaction.user_count,
            users_updated
        );

        Ok((shared_transaction, users_updated))
    }
}
