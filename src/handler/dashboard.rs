use std::sync::Arc;

use axum::{
    middleware, response::IntoResponse, routing::get, Extension, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::dashboarddb::{DashboardExt, DashboardSummary},
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    utils::decimal::BigDecimalHelpers,
    AppState,
};

pub fn dashboard_handler() -> Router {
    Router::new()
        .route("/summary", get(get_dashboard_summary))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponseDto {
    pub status: String,

    pub total_users: i64,
    pub active_users: i64,
    pub pre_register_users: i64,
    pub pending_users: i64,
    pub registered_users: i64,
    pub declined_users: i64,
    pub referenced_users: i64,
    pub direct_users: i64,

    pub pending_reference_count: i64,
    pub pending_reference_amount: f64,

    pub referenced_income_total: f64,
    pub referenced_income_referrer_share: f64,
    pub referenced_income_platform_share: f64,

    pub share_eligible_count: i64,
    pub share_eligible_amount: f64,
    pub projected_kowida_fund: f64,
    pub projected_randyll_fund: f64,

    pub total_settlements: i64,
    pub total_shared_settlements: i64,
}

impl DashboardResponseDto {
    fn from_summary(summary: &DashboardSummary) -> Self {
        DashboardResponseDto {
            status: "success".to_string(),
            total_users: summary.total_users,
            active_users: summary.active_users,
            pre_register_users: summary.pre_register_users,
            pending_users: summary.pending_users,
            registered_users: summary.registered_users,
            declined_users: summary.declined_users,
            referenced_users: summary.referenced_users,
            direct_users: summary.direct_users,
            pending_reference_count: summary.pending_reference_count,
            pending_reference_amount: summary.pending_reference_amount.round2().to_f64_or_zero(),
            referenced_income_total: summary.referenced_income_total.round2().to_f64_or_zero(),
            referenced_income_referrer_share: summary
                .referenced_income_referrer_share
                .round2()
                .to_f64_or_zero(),
            referenced_income_platform_share: summary
                .referenced_income_platform_share
                .round2()
                .to_f64_or_zero(),
            share_eligible_count: summary.share_eligible_count,
            share_eligible_amount: summary.share_eligible_amount.round2().to_f64_or_zero(),
            projected_kowida_fund: summary.projected_kowida_fund.round2().to_f64_or_zero(),
            projected_randyll_fund: summary.projected_randyll_fund.round2().to_f64_or_zero(),
            total_settlements: summary.total_settlements,
            total_shared_settlements: summary.total_shared_settlements,
        }
    }
}

pub async fn get_dashboard_summary(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let summary = app_state
        .db_client
        .get_dashboard_summary(&app_state.env.commission_rate)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(DashboardResponseDto::from_summary(&summary)))
}
