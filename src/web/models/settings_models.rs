use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::validate_phone;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactInfoRequest {
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub working_hours: String,
    #[serde(default = "empty_object")]
    pub social_media: Value,
    #[serde(default = "empty_object")]
    pub additional_info: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertSiteSettingRequest {
    #[validate(length(max = 10_000))]
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateColorSchemeRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Active palette echoed back to the client so it can apply the CSS variables.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSchemeResponse {
    pub name: &'static str,
    pub label: &'static str,
    pub colors: std::collections::BTreeMap<&'static str, &'static str>,
}
