// db/settlementdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use uuid::Uuid;

use super::db::DBClient;
use super::userdb::USER_COLUMNS;

use crate::models::referencemodel::Reference;
use crate::models::transactionmodel::{SharedTransaction, Transaction, TransactionDetails};
use crate::models::usermodel::User;
use crate::service::commission;
use crate::service::error::ServiceError;
use crate::utils::transaction_id::next_transaction_id;

/// Base eligibility for a per-reference payout. The settlement engine, the
/// reference stats and the dashboard all build on this one fragment so their
/// notions of "eligible" cannot drift apart. The per-code filter
/// (`promo_code = $n`) is appended by each call site.
pub const ELIGIBLE_BASE: &str =
    "is_active = true AND is_reference_paid = false AND role = 'user'";

/// One promo program is permanently excluded from shared-fund payouts.
pub const SHARE_EXCLUDED_PROMO: &str = "SL001";

/// Users included in a platform-wide shared-fund settlement.
pub fn share_eligible_predicate() -> String {
    format!(
        "status = 'register' AND role = 'user' AND (promo_code IS NULL OR promo_code <> '{SHARE_EXCLUDED_PROMO}')"
    )
}

/// Serializes transaction-id generation across concurrent settlements.
const TRANSACTION_ID_LOCK_KEY: i64 = 0x5452;

const TRANSACTION_COLUMNS: &str = r#"
    id,
    total_reference_count,
    total_reference_amount,
    user_id,
    reference_code,
    discount_amount,
    received_amount,
    receipt_url,
    status,
    created_at
"#;

const SHARED_TRANSACTION_COLUMNS: &str = r#"
    id,
    user_count,
    full_amount,
    kowida_fund,
    randyll_fund,
    receipt_url,
    status,
    remark,
    created_at
"#;

#[async_trait]
pub trait SettlementExt {
    /// Users currently eligible for a payout under `reference_code`. Plain
    /// read, no locks; settlement re-resolves inside its own transaction.
    async fn eligible_users(&self, reference_code: &str) -> Result<Vec<User>, sqlx::Error>;

    async fn settle_reference(
        &self,
        reference_code: &str,
        referrer_user_id: Uuid,
        total_reference_amount: BigDecimal,
        receipt_url: &str,
    ) -> Result<Transaction, ServiceError>;

    async fn settle_shared(
        &self,
        user_count: i32,
        full_amount: BigDecimal,
        kowida_fund: BigDecimal,
        randyll_fund: BigDecimal,
        receipt_url: &str,
        remark: Option<String>,
    ) -> Result<(SharedTransaction, u64), ServiceError>;

    async fn get_transaction(&self, transaction_id: &str)
        -> Result<Option<Transaction>, sqlx::Error>;

    async fn get_transactions(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Transaction>, sqlx::Error>;

    async fn get_transaction_details(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<TransactionDetails>, sqlx::Error>;

    async fn get_shared_transactions(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<SharedTransaction>, sqlx::Error>;
}

#[async_trait]
impl SettlementExt for DBClient {
    async fn eligible_users(&self, reference_code: &str) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE promo_code = $1 AND {ELIGIBLE_BASE}"
        ))
        .bind(reference_code)
        .fetch_all(&self.pool)
        .await
    }

    /// Pays the referrer for every currently-eligible user under the code.
    /// Everything from eligibility re-resolution to the final status flip
    /// happens in one database transaction; any failure rolls back the lot.
    async fn settle_reference(
        &self,
        reference_code: &str,
        referrer_user_id: Uuid,
        total_reference_amount: BigDecimal,
        receipt_url: &str,
    ) -> Result<Transaction, ServiceError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(TRANSACTION_ID_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let base_amount_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM base_amounts)")
                .fetch_one(&mut *tx)
                .await?;
        if !base_amount_exists {
            return Err(ServiceError::BaseAmountMissing);
        }

        let reference = sqlx::query_as::<_, Reference>(
            "SELECT id, code, phone, discount_amount, received_amount, created_at FROM reference_codes WHERE code = $1",
        )
        .bind(reference_code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ServiceError::ReferenceNotFound(reference_code.to_string()))?;

        // Commission parameters are a fixed copy-through from the reference.
        let (discount_amount, received_amount) = commission::referrer_split(&reference);

        let referrer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(referrer_user_id)
                .fetch_one(&mut *tx)
                .await?;
        if !referrer_exists {
            return Err(ServiceError::ReferrerNotFound(referrer_user_id));
        }

        // Re-resolve eligibility inside the transaction and lock the rows, so
        // a concurrent settlement for an overlapping set cannot double-pay.
        let eligible = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE promo_code = $1 AND {ELIGIBLE_BASE} FOR UPDATE"
        ))
        .bind(reference_code)
        .fetch_all(&mut *tx)
        .await?;

        if eligible.is_empty() {
            return Err(ServiceError::NoEligibleUsers(reference_code.to_string()));
        }

        // Ids widen past three digits, so order by (length, value) rather
        // than plain text to find the numerically-last one.
        let last_id: Option<String> = sqlx::query_scalar(
            "SELECT id FROM transactions ORDER BY length(id) DESC, id DESC LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;

        let transaction_id = next_transaction_id(last_id.as_deref())
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO transactions
            (id, total_reference_count, total_reference_amount, user_id,
             reference_code, discount_amount, received_amount, receipt_url, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, false)
            "#,
        )
        .bind(&transaction_id)
        .bind(eligible.len() as i32)
        .bind(&total_reference_amount)
        .bind(referrer_user_id)
        .bind(reference_code)
        .bind(&discount_amount)
        .bind(&received_amount)
        .bind(receipt_url)
        .execute(&mut *tx)
        .await?;

        let user_ids: Vec<Uuid> = eligible.iter().map(|user| user.id).collect();

        for user_id in &user_ids {
            sqlx::query("INSERT INTO transaction_details (user_id, transaction_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(&transaction_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE users SET is_reference_paid = true, updated_at = NOW() WHERE id = ANY($1)")
            .bind(&user_ids)
            .execute(&mut *tx)
            .await?;

        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            UPDATE transactions
            SET status = true
            WHERE id = $1
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(&transaction_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(transaction)
    }

    /// Records a platform-wide payout and marks every share-eligible user as
    /// paid. The amounts are stored exactly as supplied; reconciliation
    /// against user paid_amount totals happens outside this system.
    async fn settle_shared(
        &self,
        user_count: i32,
        full_amount: BigDecimal,
        kowida_fund: BigDecimal,
        randyll_fund: BigDecimal,
        receipt_url: &str,
        remark: Option<String>,
    ) -> Result<(SharedTransaction, u64), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let shared_transaction = sqlx::query_as::<_, SharedTransaction>(&format!(
            r#"
            INSERT INTO shared_transactions
            (user_count, full_amount, kowida_fund, randyll_fund, receipt_url, status, remark)
            VALUES ($1, $2, $3, $4, $5, true, $6)
            RETURNING {SHARED_TRANSACTION_COLUMNS}
            "#
        ))
        .bind(user_count)
        .bind(&full_amount)
        .bind(&kowida_fund)
        .bind(&randyll_fund)
        .bind(receipt_url)
        .bind(remark)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query(&format!(
            "UPDATE users SET share_paid = true, updated_at = NOW() WHERE {}",
            share_eligible_predicate()
        ))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((shared_transaction, updated.rows_affected()))
    }

    async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_transactions(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY length(id) DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_transaction_details(
        &self,
        transaction_id: &str,
    ) -> Result<Vec<TransactionDetails>, sqlx::Error> {
        sqlx::query_as::<_, TransactionDetails>(
            r#"
            SELECT id, user_id, transaction_id, created_at
            FROM transaction_details
            WHERE transaction_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_shared_transactions(
        &self,
        page: u32,
        limit: usize,
    ) -> Result<Vec<SharedTransaction>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, SharedTransaction>(&format!(
            "SELECT {SHARED_TRANSACTION_COLUMNS} FROM shared_transactions ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_base_matches_settlement_filter() {
        assert!(ELIGIBLE_BASE.contains("is_active = true"));
        assert!(ELIGIBLE_BASE.contains("is_reference_paid = false"));
        assert!(ELIGIBLE_BASE.contains("role = 'user'"));
    }

    #[test]
    fn share_predicate_excludes_fixed_promo() {
        let predicate = share_eligible_predicate();
        assert!(predicate.contains("status = 'register'"));
        assert!(predicate.contains("role = 'user'"));
        assert!(predicate.contains("promo_code IS NULL"));
        assert!(predicate.contains(&format!("promo_code <> '{SHARE_EXCLUDED_PROMO}'")));
    }
}
