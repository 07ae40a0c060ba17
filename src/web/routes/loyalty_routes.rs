use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::services::{self, LoyaltyProgramUpdate};
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::middleware::i18n::tr;
use crate::web::models::customer_models::{
    CreateLoyaltyProgramRequest, LoyaltyProgramResponse, UpdateLoyaltyProgramRequest,
};
use crate::web::AppState;

async fn list_loyalty_programs_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<LoyaltyProgramResponse>>, AppError> {
    let tiers = services::get_loyalty_programs(&app_state.db_pool).await?;
    Ok(Json(tiers.into_iter().map(Into::into).collect()))
}

async fn get_loyalty_program_handler(
    State(app_state): State<Arc<AppState>>,
    Path(program_id): Path<i32>,
) -> Result<Json<LoyaltyProgramResponse>, AppError> {
    services::get_loyalty_program_by_id(&app_state.db_pool, program_id)
        .await?
        .map(|model| Json(model.into()))
        .ok_or_else(|| AppError::not_found("loyalty_program"))
}

async fn create_loyalty_program_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateLoyaltyProgramRequest>,
) -> Result<(StatusCode, Json<LoyaltyProgramResponse>), AppError> {
    let created = services::create_loyalty_program(&app_state.db_pool, payload).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

async fn update_loyalty_program_handler(
    State(app_state): State<Arc<AppState>>,
    Path(program_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateLoyaltyProgramRequest>,
) -> Result<Json<LoyaltyProgramResponse>, AppError> {
    match services::update_loyalty_program(&app_state.db_pool, program_id, payload).await? {
        LoyaltyProgramUpdate::Updated(model) => Ok(Json(model.into())),
        LoyaltyProgramUpdate::NotFound => Err(AppError::not_found("loyalty_program")),
        LoyaltyProgramUpdate::InvalidAmountRange => {
            Err(AppError::InvalidInput(tr("errors.amount_range")))
        }
    }
}

async fn delete_loyalty_program_handler(
    State(app_state): State<Arc<AppState>>,
    Path(program_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if services::delete_loyalty_program(&app_state.db_pool, program_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("loyalty_program"))
    }
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_loyalty_programs_handler))
        .route("/{program_id}", get(get_loyalty_program_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_loyalty_program_handler)).route(
        "/{program_id}",
        put(update_loyalty_program_handler)
            .patch(update_loyalty_program_handler)
            .delete(delete_loyalty_program_handler),
    )
}
