use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use bigdecimal::BigDecimal;
use validator::Validate;

use crate::{
    db::{referencedb::ReferenceExt, userdb::UserExt},
    dtos::referencedtos::*,
    dtos::userdtos::RequestQueryDto,
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserRole,
    utils::code_generator::generate_reference_code,
    AppState,
};

const CODE_GENERATION_ATTEMPTS: usize = 5;

pub fn references_handler() -> Router {
    Router::new()
        .route(
            "/",
            post(create_reference)
                .get(get_references)
                .layer(middleware::from_fn(|state, req, next| {
                    role_check(state, req, next, vec![UserRole::Admin])
                })),
        )
        .route("/:code", get(get_reference))
        .route("/:code/stats", get(get_reference_stats))
        .route(
            "/base-amount",
            get(get_base_amount).put(set_base_amount).layer(middleware::from_fn(
                |state, req, next| role_check(state, req, next, vec![UserRole::Admin]),
            )),
        )
}

/// Creates a reference code for an existing user and promotes them to the
/// referer role. Commission parameters are fixed here and copied onto every
/// settlement made under the code.
pub async fn create_reference(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateReferenceDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let owner = app_state
        .db_client
        .get_user(None, Some(&body.phone))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("No user registered with this phone number"))?;

    if app_state
        .db_client
        .get_reference_by_phone(&body.phone)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .is_some()
    {
        return Err(HttpError::unique_constraint_violation(
            "A reference already exists for this phone number".to_string(),
        ));
    }

    let discount_amount = BigDecimal::try_from(body.discount_amount)
        .map_err(|_| HttpError::bad_request("Invalid discount amount".to_string()))?;
    let received_amount = BigDecimal::try_from(body.received_amount)
        .map_err(|_| HttpError::bad_request("Invalid received amount".to_string()))?;

    // Codes are random; retry a few times if we collide with an existing one.
    let mut saved = None;
    for _ in 0..CODE_GENERATION_ATTEMPTS {
        let code = generate_reference_code();
        match app_state
            .db_client
            .save_reference(
                code,
                body.phone.clone(),
                discount_amount.clone(),
                received_amount.clone(),
            )
            .await
        {
            Ok(reference) => {
                saved = Some(reference);
                break;
            }
            Err(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => continue,
            Err(e) => return Err(HttpError::server_error(e.to_string())),
        }
    }

    let reference = saved.ok_or_else(|| {
        HttpError::server_error("Could not allocate a unique reference code".to_string())
    })?;

    app_state
        .db_client
        .update_user_role(owner.id, UserRole::Referer)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ReferenceResponseDto {
        status: "success".to_string(),
        reference: FilterReferenceDto::filter_reference(&reference),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_reference(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let reference = app_state
        .db_client
        .get_reference_by_code(&code)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Reference code {} not found", code)))?;

    let response = ReferenceResponseDto {
        status: "success".to_string(),
        reference: FilterReferenceDto::filter_reference(&reference),
    };

    Ok(Json(response))
}

pub async fn get_reference_stats(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    // 404 for unknown codes; zero counts are a legitimate answer for known ones.
    app_state
        .db_client
        .get_reference_by_code(&code)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(format!("Reference code {} not found", code)))?;

    let stats = app_state
        .db_client
        .get_reference_stats(&code)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "stats": stats,
    })))
}

pub async fn get_references(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query_params): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let page = query_params.page.unwrap_or(1);
    let limit = query_params.limit.unwrap_or(10);

    let references = app_state
        .db_client
        .get_references(page as u32, limit)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let response = ReferenceListResponseDto {
        status: "success".to_string(),
        results: references.len(),
        references: FilterReferenceDto::filter_references(&references),
    };

    Ok(Json(response))
}

pub async fn get_base_amount(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let base = app_state
        .db_client
        .get_base_amount()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Base amount has not been configured"))?;

    Ok(Json(BaseAmountResponseDto::from_model(&base)))
}

pub async fn set_base_amount(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateBaseAmountDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let amount = BigDecimal::try_from(body.amount)
        .map_err(|_| HttpError::bad_request("Invalid amount".to_string()))?;

    let base = app_state
        .db_client
        .upsert_base_amount(amount)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(BaseAmountResponseDto::from_model(&base)))
}
