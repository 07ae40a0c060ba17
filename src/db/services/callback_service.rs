use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::db::entities::callback_request;
use crate::db::enums::CallbackStatus;
use crate::web::models::customer_models::{
    CallbackQuery, CreateCallbackRequest, UpdateCallbackRequest,
};

/// Outcome of a visitor asking for a callback.
#[derive(Debug)]
pub enum CallbackCreation {
    Created(callback_request::Model),
    /// The phone already has a request that is pending or contacted; nothing was inserted.
    AlreadyOpen(callback_request::Model),
}

pub async fn get_callback_requests(
    db: &DatabaseConnection,
    query: &CallbackQuery,
) -> Result<Vec<callback_request::Model>, DbErr> {
    let mut select = callback_request::Entity::find();
    if let Some(status) = query.status {
        select = select.filter(callback_request::Column::Status.eq(status));
    }
    select
        .order_by_desc(callback_request::Column::CreatedAt)
        .order_by_desc(callback_request::Column::Id)
        .all(db)
        .await
}

pub async fn get_callback_request_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<callback_request::Model>, DbErr> {
    callback_request::Entity::find_by_id(id).one(db).await
}

/// Inserts a pending request unless the same phone already has an open one.
pub async fn create_callback_request(
    db: &DatabaseConnection,
    req: CreateCallbackRequest,
) -> Result<CallbackCreation, DbErr> {
    let phone = req.phone.trim().to_owned();
    let txn = db.begin().await?;

    let open = callback_request::Entity::find()
        .filter(callback_request::Column::Phone.eq(phone.as_str()))
        .filter(callback_request::Column::Status.is_in(CallbackStatus::open_statuses()))
        .order_by_desc(callback_request::Column::Id)
        .one(&txn)
        .await?;
    if let Some(existing) = open {
        txn.rollback().await?;
        info!(existing_id = existing.id, "Rejected callback request for a phone with an open request.");
        return Ok(CallbackCreation::AlreadyOpen(existing));
    }

    let created = callback_request::ActiveModel {
        name: Set(req.name),
        phone: Set(phone),
        message: Set(req.message),
        call_time: Set(req.call_time),
        status: Set(CallbackStatus::Pending),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(callback_id = created.id, "Callback request created.");
    Ok(CallbackCreation::Created(created))
}

pub async fn update_callback_request(
    db: &DatabaseConnection,
    id: i32,
    req: UpdateCallbackRequest,
) -> Result<Option<callback_request::Model>, DbErr> {
    let Some(existing) = get_callback_request_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut active = existing.clone().into_active_model();
    if let Some(name) = req.name {
        active.name = Set(name);
    }
    if let Some(phone) = req.phone {
        active.phone = Set(phone.trim().to_owned());
    }
    if let Some(message) = req.message {
        active.message = Set(message);
    }
    if let Some(call_time) = req.call_time {
        active.call_time = Set(call_time);
    }
    if let Some(status) = req.status {
        active.status = Set(status);
    }
    if !active.is_changed() {
        return Ok(Some(existing));
    }
    active.update(db).await.map(Some)
}

pub async fn delete_callback_request(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = callback_request::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
