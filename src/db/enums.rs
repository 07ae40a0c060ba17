use sea_orm::entity::prelude::*;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "portfolio_category_enum")]
#[serde(rename_all = "lowercase")]
pub enum PortfolioCategory {
    #[sea_orm(string_value = "wedding")]
    Wedding,
    #[sea_orm(string_value = "corporate")]
    Corporate,
    #[sea_orm(string_value = "birthday")]
    Birthday,
    #[sea_orm(string_value = "seasonal")]
    Seasonal,
}

/// Customer standing in the loyalty program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "customer_loyalty_level_enum")]
#[serde(rename_all = "lowercase")]
pub enum CustomerLoyaltyLevel {
    #[default]
    #[sea_orm(string_value = "bronze")]
    Bronze,
    #[sea_orm(string_value = "silver")]
    Silver,
    #[sea_orm(string_value = "gold")]
    Gold,
    #[sea_orm(string_value = "platinum")]
    Platinum,
}

/// Level key of a loyalty program tier as shown on the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "loyalty_tier_enum")]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    #[sea_orm(string_value = "beginner")]
    Beginner,
    #[sea_orm(string_value = "silver")]
    Silver,
    #[sea_orm(string_value = "gold")]
    Gold,
    #[sea_orm(string_value = "platinum")]
    Platinum,
}

/// Lifecycle of a callback request. Transitions are made by admins only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "callback_status_enum")]
#[serde(rename_all = "lowercase")]
pub enum CallbackStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "contacted")]
    Contacted,
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl CallbackStatus {
    /// Statuses that block a new request for the same phone number.
    pub fn open_statuses() -> [CallbackStatus; 2] {
        [CallbackStatus::Pending, CallbackStatus::Contacted]
    }
}

macro_rules! display_as_db_value {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.to_value())
                }
            }
        )+
    };
}

display_as_db_value!(PortfolioCategory, CustomerLoyaltyLevel, LoyaltyTier, CallbackStatus);
