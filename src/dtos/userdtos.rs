use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::models::usermodel::User;
use crate::utils::decimal::BigDecimalHelpers;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 10, max = 20, message = "Phone number must be between 10-20 characters"))]
    pub phone: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(
        length(min = 1, message = "Confirm Password is required"),
        must_match(other = "password", message = "passwords do not match")
    )]
    #[serde(rename = "passwordConfirm")]
    pub password_confirm: String,

    pub promo_code: Option<String>,
}

impl RegisterUserDto {
    pub fn validate_phone_number(&self) -> Result<(), ValidationError> {
        let phone_regex = regex::Regex::new(r"^(\+?[0-9]{1,3}[- ]?)?[0-9]{3}[- ]?[0-9]{3}[- ]?[0-9]{4}$")
            .map_err(|_| ValidationError::new("Invalid phone regex"))?;

        if !phone_regex.is_match(&self.phone) {
            let mut error = ValidationError::new("invalid_phone");
            error.message = Some(Cow::from(
                "Phone number must be in a valid format (e.g., +1234567890 or 123-456-7890)",
            ));
            return Err(error);
        }
        Ok(())
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePaidAmountDto {
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub status: String,
    pub promo_code: Option<String>,
    pub is_active: bool,
    pub is_reference_paid: bool,
    pub share_paid: bool,
    pub paid_amount: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            phone: user.phone.to_owned(),
            role: user.role.to_str().to_string(),
            status: user.status.to_str().to_string(),
            promo_code: user.promo_code.clone(),
            is_active: user.is_active,
            is_reference_paid: user.is_reference_paid,
            share_paid: user.share_paid,
            paid_amount: user.paid_amount.round2().to_f64_or_zero(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponseDto {
    pub status: String,
    pub users: Vec<FilterUserDto>,
    pub results: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_dto_requires_matching_passwords() {
        let dto = RegisterUserDto {
            name: "Ada".to_string(),
            phone: "+2348012345678".to_string(),
            password: "secret123".to_string(),
            password_confirm: "different".to_string(),
            promo_code: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_dto_phone_format() {
        let mut dto = RegisterUserDto {
            name: "Ada".to_string(),
            phone: "+2348012345678".to_string(),
            password: "secret123".to_string(),
            password_confirm: "secret123".to_string(),
            promo_code: Some("SL002".to_string()),
        };
        assert!(dto.validate().is_ok());
        assert!(dto.validate_phone_number().is_ok());

        dto.phone = "not-a-phone".to_string();
        assert!(dto.validate_phone_number().is_err());
    }

    #[test]
    fn test_paid_amount_rejects_negative() {
        let dto = UpdatePaidAmountDto { amount: -1.0 };
        assert!(dto.validate().is_err());
    }
}
