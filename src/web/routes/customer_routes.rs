use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::entities::customer;
use crate::db::services;
use crate::web::error::{is_unique_violation, AppError};
use crate::web::extract::ValidatedJson;
use crate::web::models::customer_models::{
    CreateCustomerRequest, CustomerQuery, UpdateCustomerRequest,
};
use crate::web::AppState;

fn phone_conflict() -> AppError {
    AppError::conflict("errors.conflict.customer_phone", None)
}

fn map_write_error(db_err: sea_orm::DbErr) -> AppError {
    if is_unique_violation(&db_err) {
        phone_conflict()
    } else {
        AppError::from(db_err)
    }
}

async fn list_customers_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<customer::Model>>, AppError> {
    let customers = services::get_customers(&app_state.db_pool, &query).await?;
    Ok(Json(customers))
}

async fn get_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(customer_id): Path<i32>,
) -> Result<Json<customer::Model>, AppError> {
    services::get_customer_by_id(&app_state.db_pool, customer_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("customer"))
}

async fn create_customer_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<customer::Model>), AppError> {
    if services::get_customer_by_phone(&app_state.db_pool, &payload.phone)
        .await?
        .is_some()
    {
        return Err(phone_conflict());
    }

    let created = services::create_customer(&app_state.db_pool, payload)
        .await
        .map_err(map_write_error)?;
    info!(customer_id = created.id, "Customer created.");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(customer_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<customer::Model>, AppError> {
    if let Some(phone) = payload.phone.as_deref() {
        let owner = services::get_customer_by_phone(&app_state.db_pool, phone).await?;
        if owner.is_some_and(|other| other.id != customer_id) {
            return Err(phone_conflict());
        }
    }

    services::update_customer(&app_state.db_pool, customer_id, payload)
        .await
        .map_err(map_write_error)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("customer"))
}

async fn delete_customer_handler(
    State(app_state): State<Arc<AppState>>,
    Path(customer_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if services::delete_customer(&app_state.db_pool, customer_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("customer"))
    }
}

/// Customer records are admin-only.
pub fn create_customers_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_customers_handler).post(create_customer_handler))
        .route(
            "/{customer_id}",
            put(update_customer_handler)
                .patch(update_customer_handler)
                .get(get_customer_handler)
                .delete(delete_customer_handler),
        )
}
