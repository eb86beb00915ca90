// db/referencedb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use super::db::DBClient;
use super::settlementdb::ELIGIBLE_BASE;

use crate::models::referencemodel::{BaseAmount, Reference, ReferenceStats};

const REFERENCE_COLUMNS: &str = r#"
    id,
    code,
    phone,
    discount_amount,
    received_amount,
    created_at
"#;

#[async_trait]
pub trait ReferenceExt {
    async fn save_reference<T: Into<String> + Send>(
        &self,
        code: T,
        phone: T,
        discount_amount: BigDecimal,
        received_amount: BigDecimal,
    ) -> Result<Reference, sqlx::Error>;

    async fn get_reference_by_code(&self, code: &str) -> Result<Option<Reference>, sqlx::Error>;

    async fn get_reference_by_phone(&self, phone: &str) -> Result<Option<Reference>, sqlx::Error>;

    async fn get_references(&self, page: u32, limit: usize) -> Result<Vec<Reference>, sqlx::Error>;

    async fn get_reference_stats(&self, code: &str) -> Result<ReferenceStats, sqlx::Error>;

    async fn get_base_amount(&self) -> Result<Option<BaseAmount>, sqlx::Error>;

    async fn upsert_base_amount(&self, amount: BigDecimal) -> Result<BaseAmount, sqlx::Error>;
}

#[async_trait]
impl ReferenceExt for DBClient {
    async fn save_reference<T: Into<String> + Send>(
        &self,
        code: T,
        phone: T,
        discount_amount: BigDecimal,
        received_amount: BigDecimal,
    ) -> Result<Reference, sqlx::Error> {
        sqlx::query_as::<_, Reference>(&format!(
            r#"
            INSERT INTO reference_codes (code, phone, discount_amount, received_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING {REFERENCE_COLUMNS}
            "#
        ))
        .bind(code.into())
        .bind(phone.into())
        .bind(discount_amount)
        .bind(received_amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_reference_by_code(&self, code: &str) -> Result<Option<Reference>, sqlx::Error> {
        sqlx::query_as::<_, Reference>(&format!(
            "SELECT {REFERENCE_COLUMNS} FROM reference_codes WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_reference_by_phone(&self, phone: &str) -> Result<Option<Reference>, sqlx::Error> {
        sqlx::query_as::<_, Reference>(&format!(
            "SELECT {REFERENCE_COLUMNS} FROM reference_codes WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_references(&self, page: u32, limit: usize) -> Result<Vec<Reference>, sqlx::Error> {
        let offset = (page - 1) * limit as u32;

        sqlx::query_as::<_, Reference>(&format!(
            "SELECT {REFERENCE_COLUMNS} FROM reference_codes ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await
    }

    /// Per-code rollup. The pending count uses the same predicate the
    /// settlement engine locks on, so the dashboard figure and the set a
    /// settlement would pay can never diverge.
    async fn get_reference_stats(&self, code: &str) -> Result<ReferenceStats, sqlx::Error> {
        let (total_registered, pending_settlement, settled): (i64, i64, i64) =
            sqlx::query_as(&format!(
                r#"
                SELECT
                    COUNT(*) FILTER (WHERE promo_code = $1),
                    COUNT(*) FILTER (WHERE promo_code = $1 AND {ELIGIBLE_BASE}),
                    COUNT(*) FILTER (WHERE promo_code = $1 AND is_reference_paid = true)
                FROM users
                "#
            ))
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        Ok(ReferenceStats {
            code: code.to_string(),
            total_registered,
            pending_settlement,
            settled,
        })
    }

    async fn get_base_amount(&self) -> Result<Option<BaseAmount>, sqlx::Error> {
        sqlx::query_as::<_, BaseAmount>(
            "SELECT id, amount, updated_at FROM base_amounts ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_base_amount(&self, amount: BigDecimal) -> Result<BaseAmount, sqlx::Error> {
        let existing = self.get_base_amount().await?;

        match existing {
            Some(base) => {
                sqlx::query_as::<_, BaseAmount>(
                    r#"
                    UPDATE base_amounts
                    SET amount = $2, updated_at = NOW()
                    WHERE id = $1
                    RETURNING id, amount, updated_at
                    "#,
                )
                .bind(base.id)
                .bind(amount)
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, BaseAmount>(
                    r#"
                    INSERT INTO base_amounts (amount)
                    VALUES ($1)
                    RETURNING id, amount, updated_at
                    "#,
                )
                .bind(amount)
                .fetch_one(&self.pool)
                .await
            }
        }
    }
}
