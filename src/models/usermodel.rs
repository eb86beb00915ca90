use bigdecimal::BigDecimal;
use chrono::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Referer,
    User,
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Referer => "referer",
            UserRole::User => "user",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "user_status", rename_all = "snake_case")]
pub enum UserStatus {
    PreRegister,
    Pending,
    Register,
    Declined,
}

impl UserStatus {
    pub fn to_str(&self) -> &str {
        match self {
            UserStatus::PreRegister => "pre_register",
            UserStatus::Pending => "pending",
            UserStatus::Register => "register",
            UserStatus::Declined => "declined",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: uuid::Uuid,
    pub name: String,
    pub phone: String,
    pub password: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub promo_code: Option<String>,
    pub is_active: bool,
    pub is_reference_paid: bool,
    pub share_paid: bool,
    pub paid_amount: BigDecimal,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}
