use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::entities::portfolio_item;
use crate::db::services;
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::models::content_models::{
    CreatePortfolioItemRequest, PortfolioQuery, UpdatePortfolioItemRequest,
};
use crate::web::AppState;

async fn list_portfolio_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PortfolioQuery>,
) -> Result<Json<Vec<portfolio_item::Model>>, AppError> {
    let items = services::get_portfolio_items(&app_state.db_pool, &query).await?;
    Ok(Json(items))
}

async fn get_portfolio_item_handler(
    State(app_state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
) -> Result<Json<portfolio_item::Model>, AppError> {
    services::get_portfolio_item_by_id(&app_state.db_pool, item_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("portfolio_item"))
}

async fn create_portfolio_item_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreatePortfolioItemRequest>,
) -> Result<(StatusCode, Json<portfolio_item::Model>), AppError> {
    let created = services::create_portfolio_item(&app_state.db_pool, payload).await?;
    info!(item_id = created.id, category = %created.category, "Portfolio item created.");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_portfolio_item_handler(
    State(app_state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdatePortfolioItemRequest>,
) -> Result<Json<portfolio_item::Model>, AppError> {
    services::update_portfolio_item(&app_state.db_pool, item_id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("portfolio_item"))
}

async fn delete_portfolio_item_handler(
    State(app_state): State<Arc<AppState>>,
    Path(item_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if services::delete_portfolio_item(&app_state.db_pool, item_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("portfolio_item"))
    }
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_portfolio_handler))
        .route("/{item_id}", get(get_portfolio_item_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_portfolio_item_handler)).route(
        "/{item_id}",
        put(update_portfolio_item_handler)
            .patch(update_portfolio_item_handler)
            .delete(delete_portfolio_item_handler),
    )
}
