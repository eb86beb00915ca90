use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::settlementdb::SettlementExt,
    dtos::settlementdtos::*,
    dtos::userdtos::RequestQueryDto,
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    service::storage::ReceiptFile,
    utils::decimal::parse_amount,
    AppState,
};

pub fn settlement_handler() -> Router {
    Router::new()
        .route("/reference", post(settle_reference))
        .route("/shared", post(settle_shared))
        .route("/eligible/:reference_code", get(get_eligible_users))
        .route("/transactions", get(get_transactions))
        .route("/transactions/:transaction_id", get(get_transaction))
        .route("/shared-transactions", get(get_shared_transactions))
        .layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserRole::Admin])
        }))
}

/// Pulls text fields and the receipt file out of a multipart body. Field
/// values arrive as strings; typed parsing happens at the call site.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Option<ReceiptFile>), HttpError> {
    let mut fields = HashMap::new();
    let mut receipt = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "receipt" {
            let filename = field.file_name().unwrap_or("receipt").to_string();
            let content_type = field.content_type().map(|ct| ct.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| HttpError::bad_request(e.to_string()))?
                .to_vec();
            receipt = Some(ReceiptFile {
                filename,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| HttpError::bad_request(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    Ok((fields, receipt))
}

fn required_field<'a>(
    fields: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, HttpError> {
    fields
        .get(name)
        .map(|value| value.as_str())
        .ok_or_else(|| HttpError::bad_request(format!("Missing field: {}", name)))
}

fn parse_number<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, HttpError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| HttpError::bad_request(format!("Invalid value for field: {}", name)))
}

pub async fn settle_reference(
    Extension(app_state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let (fields, receipt) = read_multipart(multipart).await?;

    let body = SettleReferenceDto {
        reference_code: required_field(&fields, "reference_code")?.to_string(),
        referrer_user_id: Uuid::parse_str(required_field(&fields, "referrer_user_id")?)
            .map_err(|_| HttpError::bad_request("Invalid referrer_user_id".to_string()))?,
        total_reference_amount: parse_number(
            required_field(&fields, "total_reference_amount")?,
            "total_reference_amount",
        )?,
    };

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Re-parse the raw string so amounts stay exact decimals end to end.
    let total_reference_amount =
        parse_amount(required_field(&fields, "total_reference_amount")?)
            .map_err(HttpError::bad_request)?;

    let transaction = app_state
        .settlement_service
        .settle_reference(
            &body.reference_code,
            body.referrer_user_id,
            total_reference_amount,
            receipt,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SettlementResponseDto::from_transaction(&transaction)),
    ))
}

pub async fn settle_shared(
    Extension(app_state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let (fields, receipt) = read_multipart(multipart).await?;

    let body = SettleSharedDto {
        user_count: parse_number(required_field(&fields, "user_count")?, "user_count")?,
        full_amount: parse_number(required_field(&fields, "full_amount")?, "full_amount")?,
        kowida_fund: parse_number(required_field(&fields, "kowida_fund")?, "kowida_fund")?,
        randyll_fund: parse_number(required_field(&fields, "randyll_fund")?, "randyll_fund")?,
        remark: fields.get("remark").cloned(),
    };

    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let full_amount =
        parse_amount(required_field(&fields, "full_amount")?).map_err(HttpError::bad_request)?;
    let kowida_fund =
        parse_amount(required_field(&fields, "kowida_fund")?).map_err(HttpError::bad_request)?;
    let randyll_fund =
        parse_amount(required_field(&fields, "randyll_fund")?).map_err(HttpError::bad_request)?;

    let (shared_transaction, users_updated) = app_state
        .settlement_service
        .settle_shared(
            body.user_count,
            full_amount,
            kowida_fund,
            randyll_fund,
            body.remark,
            receipt,
        )
        .await?;

    let response = SharedSettlementResponseDto {
        status: "success".to_string(),
        transaction_id: shared_transaction.id.to_string(),
        users_updated,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Preview of who the next settlement for this code would pay. An empty
/// list is a legitimate answer here; only settlement itself rejects it.
pub async fn get_eligible_users(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(reference_code): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .db_client
        .eligible_users(&reference_code)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "reference_code": reference_code,
        "results": users.len(),
        "users": crate::dtos::userdtos::FilterUserDto::filter_users(&users),
    })))
}

pub async fn get_transaction(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let transaction = app_state
        .db_client
        .get_transaction(&transaction_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| {
            HttpError::not_found(format!("Transaction {} not found", transaction_id))
        })?;

    let details = app_state
        .db_client
        .get_transaction_details(&transaction_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "transaction": FilterTransactionDto::filter_transaction(&transaction),
        "details": details,
    })))
}

pub async fn get_transactions(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let transactions = app_state
        .db_client
        .get_transactions(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = TransactionListResponseDto {
        status: "success".to_string(),
        results: transactions.len(),
        transactions: FilterTransactionDto::filter_transactions(&transactions),
    };

    Ok(Json(response))
}

pub async fn get_shared_transactions(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let transactions = app_state
        .db_client
        .get_shared_transactions(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = SharedTransactionListResponseDto {
        status: "success".to_string(),
        results: transactions.len(),
        transactions: FilterSharedTransactionDto::filter_shared_transactions(&transactions),
    };

    Ok(Json(response))
}
