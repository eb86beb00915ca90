use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::referencemodel::{BaseAmount, Reference};
use crate::utils::decimal::BigDecimalHelpers;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct CreateReferenceDto {
    #[validate(length(min = 10, max = 20, message = "Phone number must be between 10-20 characters"))]
    pub phone: String,

    #[validate(range(min = 0.0, message = "Discount amount cannot be negative"))]
    pub discount_amount: f64,

    #[validate(range(min = 0.0, message = "Received amount cannot be negative"))]
    pub received_amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterReferenceDto {
    pub id: String,
    pub code: String,
    pub phone: String,
    pub discount_amount: f64,
    pub received_amount: f64,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterReferenceDto {
    pub fn filter_reference(reference: &Reference) -> Self {
        FilterReferenceDto {
            id: reference.id.to_string(),
            code: reference.code.to_owned(),
            phone: reference.phone.to_owned(),
            discount_amount: reference.discount_amount.round2().to_f64_or_zero(),
            received_amount: reference.received_amount.round2().to_f64_or_zero(),
            created_at: reference.created_at,
        }
    }

    pub fn filter_references(references: &[Reference]) -> Vec<FilterReferenceDto> {
        references.iter().map(Self::filter_reference).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferenceResponseDto {
    pub status: String,
    pub reference: FilterReferenceDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReferenceListResponseDto {
    pub status: String,
    pub references: Vec<FilterReferenceDto>,
    pub results: usize,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBaseAmountDto {
    #[validate(range(min = 0.0, message = "Amount cannot be negative"))]
    pub amount: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BaseAmountResponseDto {
    pub status: String,
    pub amount: f64,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl BaseAmountResponseDto {
    pub fn from_model(base: &BaseAmount) -> Self {
        BaseAmountResponseDto {
            status: "success".to_string(),
            amount: base.amount.round2().to_f64_or_zero(),
            updated_at: base.updated_at,
        }
    }
}
