use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    db::{referencedb::ReferenceExt, userdb::UserExt},
    dtos::userdtos::*,
    error::{ErrorMessage, HttpError},
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// New accounts start at pre_register and inactive; an admin activates them
/// once payment is confirmed, which is what makes them settlement-eligible.
pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.validate_phone_number()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if let Some(promo_code) = &body.promo_code {
        app_state
            .db_client
            .get_reference_by_code(promo_code)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .ok_or_else(|| {
                HttpError::bad_request(format!("Unknown reference code: {}", promo_code))
            })?;
    }

    let existing = app_state
        .db_client
        .get_user(None, Some(&body.phone))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if existing.is_some() {
        return Err(HttpError::unique_constraint_violation(
            ErrorMessage::PhoneExist.to_string(),
        ));
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(
            body.name.clone(),
            body.phone.clone(),
            hashed_password,
            body.promo_code.clone(),
        )
        .await
        .map_err(|db_err| {
            if let sqlx::Error::Database(db_error) = &db_err {
                if db_error.is_unique_violation() {
                    return HttpError::unique_constraint_violation(
                        ErrorMessage::PhoneExist.to_string(),
                    );
                }
            }
            HttpError::server_error(db_err.to_string())
        })?;

    let response = UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state
        .db_client
        .get_user(None, Some(&body.phone))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::unauthorized(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let token = token::create_token(
        &user.id,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage * 60,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    })
    .into_response();

    response.headers_mut().append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build auth cookie".to_string()))?,
    );

    Ok(response)
}
