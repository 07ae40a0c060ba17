use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::entities::contact_info;
use crate::db::services;
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::models::settings_models::UpdateContactInfoRequest;
use crate::web::AppState;

async fn get_contact_info_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<contact_info::Model>, AppError> {
    services::get_contact_info(&app_state.db_pool)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("contact_info"))
}

async fn update_contact_info_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<UpdateContactInfoRequest>,
) -> Result<Json<contact_info::Model>, AppError> {
    let saved = services::upsert_contact_info(&app_state.db_pool, payload).await?;
    Ok(Json(saved))
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_contact_info_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/", put(update_contact_info_handler))
}
