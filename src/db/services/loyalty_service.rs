use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use serde_json::json;

use crate::db::entities::loyalty_program;
use crate::web::models::customer_models::{
    CreateLoyaltyProgramRequest, UpdateLoyaltyProgramRequest,
};

/// Result of a partial tier update.
#[derive(Debug)]
pub enum LoyaltyProgramUpdate {
    Updated(loyalty_program::Model),
    NotFound,
    /// The merged tier would end below where it starts.
    InvalidAmountRange,
}

/// Tiers ordered by the spend that unlocks them.
pub async fn get_loyalty_programs(
    db: &DatabaseConnection,
) -> Result<Vec<loyalty_program::Model>, DbErr> {
    loyalty_program::Entity::find()
        .order_by_asc(loyalty_program::Column::MinAmount)
        .order_by_asc(loyalty_program::Column::Id)
        .all(db)
        .await
}

pub async fn get_loyalty_program_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<loyalty_program::Model>, DbErr> {
    loyalty_program::Entity::find_by_id(id).one(db).await
}

pub async fn create_loyalty_program(
    db: &DatabaseConnection,
    req: CreateLoyaltyProgramRequest,
) -> Result<loyalty_program::Model, DbErr> {
    loyalty_program::ActiveModel {
        level: Set(req.level),
        title: Set(req.title),
        description: Set(req.description),
        benefits: Set(json!(req.benefits)),
        min_amount: Set(req.min_amount),
        max_amount: Set(req.max_amount),
        discount: Set(req.discount),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update_loyalty_program(
    db: &DatabaseConnection,
    id: i32,
    req: UpdateLoyaltyProgramRequest,
) -> Result<LoyaltyProgramUpdate, DbErr> {
    let Some(existing) = get_loyalty_program_by_id(db, id).await? else {
        return Ok(LoyaltyProgramUpdate::NotFound);
    };

    let min_amount = req.min_amount.unwrap_or(existing.min_amount);
    let max_amount = req.max_amount.unwrap_or(existing.max_amount);
    if max_amount.is_some_and(|max| max < min_amount) {
        return Ok(LoyaltyProgramUpdate::InvalidAmountRange);
    }

    let mut active = existing.clone().into_active_model();
    if let Some(level) = req.level {
        active.level = Set(level);
    }
    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(description) = req.description {
        active.description = Set(description);
    }
    if let Some(benefits) = req.benefits {
        active.benefits = Set(json!(benefits));
    }
    if let Some(min_amount) = req.min_amount {
        active.min_amount = Set(min_amount);
    }
    if let Some(max_amount) = req.max_amount {
        active.max_amount = Set(max_amount);
    }
    if let Some(discount) = req.discount {
        active.discount = Set(discount);
    }
    if !active.is_changed() {
        return Ok(LoyaltyProgramUpdate::Updated(existing));
    }
    active.update(db).await.map(LoyaltyProgramUpdate::Updated)
}

pub async fn delete_loyalty_program(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = loyalty_program::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
