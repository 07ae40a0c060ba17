use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::db::entities::customer;
use crate::web::models::customer_models::{
    CreateCustomerRequest, CustomerQuery, UpdateCustomerRequest,
};

/// Lists customers by name. `search` matches a substring of the name or phone.
pub async fn get_customers(
    db: &DatabaseConnection,
    query: &CustomerQuery,
) -> Result<Vec<customer::Model>, DbErr> {
    let mut select = customer::Entity::find();
    if let Some(level) = query.loyalty_level {
        select = select.filter(customer::Column::LoyaltyLevel.eq(level));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(customer::Column::Name.contains(search))
                .add(customer::Column::Phone.contains(search)),
        );
    }
    select
        .order_by_asc(customer::Column::Name)
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await
}

pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<customer::Model>, DbErr> {
    customer::Entity::find_by_id(id).one(db).await
}

pub async fn get_customer_by_phone(
    db: &DatabaseConnection,
    phone: &str,
) -> Result<Option<customer::Model>, DbErr> {
    customer::Entity::find()
        .filter(customer::Column::Phone.eq(phone.trim()))
        .one(db)
        .await
}

pub async fn create_customer(
    db: &DatabaseConnection,
    req: CreateCustomerRequest,
) -> Result<customer::Model, DbErr> {
    customer::ActiveModel {
        name: Set(req.name),
        phone: Set(req.phone.trim().to_owned()),
        loyalty_level: Set(req.loyalty_level.unwrap_or_default()),
        notes: Set(req.notes),
        total_orders: Set(req.total_orders.unwrap_or(0)),
        last_order_date: Set(req.last_order_date),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update_customer(
    db: &DatabaseConnection,
    id: i32,
    req: UpdateCustomerRequest,
) -> Result<Option<customer::Model>, DbErr> {
    let Some(existing) = get_customer_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut active = existing.clone().into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(phone) = req.phone {
        active.phone = Set(phone.trim().to_owned());
    }
    if let Some(level) = req.loyalty_level {
        active.loyalty_level = Set(level);
    }
    if let Some(notes) = req.notes {
        active.notes = Set(notes);
    }
    if let Some(total_orders) = req.total_orders {
        active.total_orders = Set(total_orders);
    }
    if let Some(last_order_date) = req.last_order_date {
        active.last_order_date = Set(last_order_date);
    }
    if !active.is_changed() {
        return Ok(Some(existing));
    }
    active.update(db).await.map(Some)
}

pub async fn delete_customer(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = customer::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
