use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::db::entities::callback_request;
use crate::db::services::{self, CallbackCreation};
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::models::customer_models::{
    CallbackConflictDetails, CallbackQuery, CreateCallbackRequest, UpdateCallbackRequest,
};
use crate::web::AppState;

/// Public endpoint behind the site's contact form and the chatbot.
async fn create_callback_request_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateCallbackRequest>,
) -> Result<(StatusCode, Json<callback_request::Model>), AppError> {
    match services::create_callback_request(&app_state.db_pool, payload).await? {
        CallbackCreation::Created(model) => Ok((StatusCode::CREATED, Json(model))),
        CallbackCreation::AlreadyOpen(existing) => {
            let details = CallbackConflictDetails {
                existing_request_id: existing.id,
                status: existing.status,
            };
            Err(AppError::conflict(
                "errors.conflict.callback_pending",
                Some(serde_json::to_value(details)?),
            ))
        }
    }
}

async fn list_callback_requests_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Json<Vec<callback_request::Model>>, AppError> {
    let requests = services::get_callback_requests(&app_state.db_pool, &query).await?;
    Ok(Json(requests))
}

async fn get_callback_request_handler(
    State(app_state): State<Arc<AppState>>,
    Path(request_id): Path<i32>,
) -> Result<Json<callback_request::Model>, AppError> {
    services::get_callback_request_by_id(&app_state.db_pool, request_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("callback_request"))
}

async fn update_callback_request_handler(
    State(app_state): State<Arc<AppState>>,
    Path(request_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateCallbackRequest>,
) -> Result<Json<callback_request::Model>, AppError> {
    services::update_callback_request(&app_state.db_pool, request_id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("callback_request"))
}

async fn delete_callback_request_handler(
    State(app_state): State<Arc<AppState>>,
    Path(request_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if services::delete_callback_request(&app_state.db_pool, request_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("callback_request"))
    }
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_callback_request_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_callback_requests_handler))
        .route(
            "/{request_id}",
            get(get_callback_request_handler)
                .put(update_callback_request_handler)
                .patch(update_callback_request_handler)
                .delete(delete_callback_request_handler),
        )
}
