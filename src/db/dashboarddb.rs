// db/dashboarddb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use super::db::DBClient;
use super::settlementdb::{share_eligible_predicate, ELIGIBLE_BASE};

use crate::service::commission;

/// Read-only rollups for the admin dashboard. Every count and sum is built
/// from the same predicates the settlement engine executes, so the figures
/// shown always describe exactly what a settlement would pay.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct DashboardSummary {
    pub total_users: i64,
    pub active_users: i64,
    pub pre_register_users: i64,
    pub pending_users: i64,
    pub registered_users: i64,
    pub declined_users: i64,
    pub referenced_users: i64,
    pub direct_users: i64,

    pub pending_reference_count: i64,
    pub pending_reference_amount: BigDecimal,

    pub referenced_income_total: BigDecimal,
    pub referenced_income_referrer_share: BigDecimal,
    pub referenced_income_platform_share: BigDecimal,

    pub share_eligible_count: i64,
    pub share_eligible_amount: BigDecimal,
    /// What the next shared settlement would hand each stakeholder if the
    /// eligible paid_amount total were distributed today.
    pub projected_kowida_fund: BigDecimal,
    pub projected_randyll_fund: BigDecimal,

    pub total_settlements: i64,
    pub total_shared_settlements: i64,
}

#[async_trait]
pub trait DashboardExt {
    async fn get_dashboard_summary(
        &self,
        commission_rate: &BigDecimal,
    ) -> Result<DashboardSummary, sqlx::Error>;
}

#[async_trait]
impl DashboardExt for DBClient {
    async fn get_dashboard_summary(
        &self,
        commission_rate: &BigDecimal,
    ) -> Result<DashboardSummary, sqlx::Error> {
        let share_predicate = share_eligible_predicate();

        let (
            total_users,
            active_users,
            pre_register_users,
            pending_users,
            registered_users,
            declined_users,
            referenced_users,
            direct_users,
            pending_reference_count,
            share_eligible_count,
        ): (i64, i64, i64, i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(&format!(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE is_active = true),
                COUNT(*) FILTER (WHERE status = 'pre_register'),
                COUNT(*) FILTER (WHERE status = 'pending'),
                COUNT(*) FILTER (WHERE status = 'register'),
                COUNT(*) FILTER (WHERE status = 'declined'),
                COUNT(*) FILTER (WHERE promo_code IS NOT NULL),
                COUNT(*) FILTER (WHERE promo_code IS NULL),
                COUNT(*) FILTER (WHERE promo_code IS NOT NULL AND {ELIGIBLE_BASE}),
                COUNT(*) FILTER (WHERE {share_predicate})
            FROM users
            "#
        ))
        .fetch_one(&self.pool)
        .await?;

        let (pending_reference_amount, referenced_income_total, share_eligible_amount): (
            BigDecimal,
            BigDecimal,
            BigDecimal,
        ) = sqlx::query_as(&format!(
            r#"
            SELECT
                COALESCE(SUM(paid_amount) FILTER (WHERE promo_code IS NOT NULL AND {ELIGIBLE_BASE}), 0),
                COALESCE(SUM(paid_amount) FILTER (WHERE promo_code IS NOT NULL AND status = 'register' AND role = 'user'), 0),
                COALESCE(SUM(paid_amount) FILTER (WHERE {share_predicate}), 0)
            FROM users
            "#
        ))
        .fetch_one(&self.pool)
        .await?;

        let (total_settlements, total_shared_settlements): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM transactions WHERE status = true),
                (SELECT COUNT(*) FROM shared_transactions WHERE status = true)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        // Same splits the settlement reporting applies: the configured
        // platform rate for referenced income, 60/40 for shared funds.
        let (referrer_share, platform_share) =
            commission::platform_split(&referenced_income_total, commission_rate);
        let (projected_kowida_fund, projected_randyll_fund) =
            commission::fund_split(&share_eligible_amount);

        Ok(DashboardSummary {
            total_users,
            active_users,
            pre_register_users,
            pending_users,
            registered_users,
            declined_users,
            referenced_users,
            direct_users,
            pending_reference_count,
            pending_reference_amount,
            referenced_income_total,
            referenced_income_referrer_share: referrer_share,
            referenced_income_platform_share: platform_share,
            share_eligible_count,
            share_eligible_amount,
            projected_kowida_fund,
            projected_randyll_fund,
            total_settlements,
            total_shared_settlements,
        })
    }
}
