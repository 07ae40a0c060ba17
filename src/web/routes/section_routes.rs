use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::DbErr;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::db::entities::section;
use crate::db::services::{self, SectionUpsert};
use crate::web::error::{is_unique_violation, AppError};
use crate::web::extract::ValidatedJson;
use crate::web::middleware::i18n::tr;
use crate::web::models::content_models::{
    CreateSectionRequest, SectionNamePath, UpdateSectionRequest,
};
use crate::web::AppState;

/// A racing insert of the same name loses on the unique index.
fn section_write_error(db_err: DbErr) -> AppError {
    if is_unique_violation(&db_err) {
        AppError::conflict("errors.conflict.section_name", None)
    } else {
        AppError::from(db_err)
    }
}

async fn list_sections_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<section::Model>>, AppError> {
    let sections = services::get_all_sections(&app_state.db_pool).await?;
    Ok(Json(sections))
}

async fn get_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<section::Model>, AppError> {
    services::get_section_by_name(&app_state.db_pool, &name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("section"))
}

async fn create_section_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateSectionRequest>,
) -> Result<(StatusCode, Json<section::Model>), AppError> {
    if services::get_section_by_name(&app_state.db_pool, &payload.name)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("errors.conflict.section_name", None));
    }

    let created = services::create_section(&app_state.db_pool, payload)
        .await
        .map_err(section_write_error)?;
    info!(section = %created.name, "Section created.");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn upsert_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path(path): Path<SectionNamePath>,
    ValidatedJson(payload): ValidatedJson<UpdateSectionRequest>,
) -> Result<(StatusCode, Json<section::Model>), AppError> {
    path.validate()?;
    let upsert = services::upsert_section(&app_state.db_pool, &path.name, payload)
        .await
        .map_err(section_write_error)?;
    match upsert {
        SectionUpsert::Updated(model) => Ok((StatusCode::OK, Json(model))),
        SectionUpsert::Created(model) => {
            info!(section = %model.name, "Section created by update.");
            Ok((StatusCode::CREATED, Json(model)))
        }
        SectionUpsert::MissingTitle => {
            Err(AppError::InvalidInput(tr("errors.section_title_required")))
        }
    }
}

async fn delete_section_handler(
    State(app_state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    if services::delete_section(&app_state.db_pool, &name).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("section"))
    }
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_sections_handler))
        .route("/{name}", get(get_section_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_section_handler)).route(
        "/{name}",
        put(upsert_section_handler)
            .patch(upsert_section_handler)
            .delete(delete_section_handler),
    )
}
