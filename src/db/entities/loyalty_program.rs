use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::LoyaltyTier;

/// A discount bracket keyed by cumulative spend.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loyalty_programs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub level: LoyaltyTier,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// JSON array of benefit strings.
    pub benefits: Json,
    pub min_amount: i32,
    pub max_amount: Option<i32>,
    /// Discount in percent.
    pub discount: i32,
}

impl Model {
    pub fn benefit_list(&self) -> Vec<String> {
        serde_json::from_value(self.benefits.clone()).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
