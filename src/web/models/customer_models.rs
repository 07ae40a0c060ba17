use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{double_option, validate_phone};
use crate::db::enums::{CallbackStatus, CustomerLoyaltyLevel, LoyaltyTier};

// --- Customers ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub loyalty_level: Option<CustomerLoyaltyLevel>,
    pub notes: Option<String>,
    #[validate(range(min = 0))]
    pub total_orders: Option<i32>,
    pub last_order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    pub loyalty_level: Option<CustomerLoyaltyLevel>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[validate(range(min = 0))]
    pub total_orders: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub last_order_date: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub loyalty_level: Option<CustomerLoyaltyLevel>,
    pub search: Option<String>,
}

// --- Callback requests ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallbackRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    #[validate(length(max = 128))]
    pub call_time: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCallbackRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub message: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub call_time: Option<Option<String>>,
    pub status: Option<CallbackStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub status: Option<CallbackStatus>,
}

/// Details of the open request that blocked a new one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackConflictDetails {
    pub existing_request_id: i32,
    pub status: CallbackStatus,
}

// --- Loyalty program ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_amount_range", skip_on_field_errors = true))]
pub struct CreateLoyaltyProgramRequest {
    pub level: LoyaltyTier,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[validate(range(min = 0))]
    pub min_amount: i32,
    #[validate(range(min = 0))]
    pub max_amount: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub discount: i32,
}

fn validate_amount_range(
    req: &CreateLoyaltyProgramRequest,
) -> Result<(), validator::ValidationError> {
    match req.max_amount {
        Some(max) if max < req.min_amount => Err(validator::ValidationError::new("amount_range")),
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoyaltyProgramRequest {
    pub level: Option<LoyaltyTier>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub benefits: Option<Vec<String>>,
    #[validate(range(min = 0))]
    pub min_amount: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_amount: Option<Option<i32>>,
    #[validate(range(min = 0, max = 100))]
    pub discount: Option<i32>,
}

/// Loyalty tier as returned by the API, with `benefits` decoded into a list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyProgramResponse {
    pub id: i32,
    pub level: LoyaltyTier,
    pub title: String,
    pub description: String,
    pub benefits: Vec<String>,
    pub min_amount: i32,
    pub max_amount: Option<i32>,
    pub discount: i32,
}

impl From<crate::db::entities::loyalty_program::Model> for LoyaltyProgramResponse {
    fn from(model: crate::db::entities::loyalty_program::Model) -> Self {
        let benefits = model.benefit_list();
        Self {
            id: model.id,
            level: model.level,
            title: model.title,
            description: model.description,
            benefits,
            min_amount: model.min_amount,
            max_amount: model.max_amount,
            discount: model.discount,
        }
    }
}
