use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::portfolio_item;
use crate::web::models::content_models::{
    CreatePortfolioItemRequest, PortfolioQuery, UpdatePortfolioItemRequest,
};

pub async fn get_portfolio_items(
    db: &DatabaseConnection,
    query: &PortfolioQuery,
) -> Result<Vec<portfolio_item::Model>, DbErr> {
    let mut select = portfolio_item::Entity::find();
    if let Some(active) = query.active {
        select = select.filter(portfolio_item::Column::IsActive.eq(active));
    }
    if let Some(category) = query.category {
        select = select.filter(portfolio_item::Column::Category.eq(category));
    }
    select
        .order_by_asc(portfolio_item::Column::Id)
        .all(db)
        .await
}

pub async fn get_portfolio_item_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<portfolio_item::Model>, DbErr> {
    portfolio_item::Entity::find_by_id(id).one(db).await
}

pub async fn create_portfolio_item(
    db: &DatabaseConnection,
    req: CreatePortfolioItemRequest,
) -> Result<portfolio_item::Model, DbErr> {
    portfolio_item::ActiveModel {
        title: Set(req.title),
        description: Set(req.description),
        category: Set(req.category),
        image_url: Set(req.image_url),
        is_active: Set(req.is_active.unwrap_or(true)),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Partial update. Setting `isActive` to its current value is a no-op write.
pub async fn update_portfolio_item(
    db: &DatabaseConnection,
    id: i32,
    req: UpdatePortfolioItemRequest,
) -> Result<Option<portfolio_item::Model>, DbErr> {
    let Some(item) = get_portfolio_item_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut active = item.clone().into_active_model();
    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(description) = req.description {
        active.description = Set(description);
    }
    if let Some(category) = req.category {
        active.category = Set(category);
    }
    if let Some(image_url) = req.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(is_active) = req.is_active {
        active.is_active = Set(is_active);
    }
    if !active.is_changed() {
        return Ok(Some(item));
    }
    active.update(db).await.map(Some)
}

pub async fn delete_portfolio_item(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = portfolio_item::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
