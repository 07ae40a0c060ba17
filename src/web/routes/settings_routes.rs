use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::entities::site_setting;
use crate::db::services;
use crate::services::color_scheme::{self, COLOR_SCHEME_SETTING_KEY};
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::middleware::i18n::tr;
use crate::web::models::settings_models::{
    ColorSchemeResponse, UpdateColorSchemeRequest, UpsertSiteSettingRequest,
};
use crate::web::models::AuthenticatedUser;
use crate::web::AppState;

// --- Site settings ---

async fn list_site_settings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<site_setting::Model>>, AppError> {
    let settings = services::get_all_site_settings(&app_state.db_pool).await?;
    Ok(Json(settings))
}

async fn get_site_setting_handler(
    State(app_state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<site_setting::Model>, AppError> {
    services::get_site_setting(&app_state.db_pool, &key)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("site_setting"))
}

async fn upsert_site_setting_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(key): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpsertSiteSettingRequest>,
) -> Result<Json<site_setting::Model>, AppError> {
    let saved = services::upsert_site_setting(
        &app_state.db_pool,
        &key,
        &payload.value,
        payload.description,
        Some(&authenticated_user.username),
    )
    .await?;
    info!(key = %saved.key, admin = %authenticated_user.username, "Site setting saved.");
    Ok(Json(saved))
}

async fn delete_site_setting_handler(
    State(app_state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<StatusCode, AppError> {
    if services::delete_site_setting(&app_state.db_pool, &key).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("site_setting"))
    }
}

pub fn create_site_settings_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_site_settings_handler))
        .route(
            "/{key}",
            get(get_site_setting_handler)
                .put(upsert_site_setting_handler)
                .delete(delete_site_setting_handler),
        )
}

// --- Color schemes ---

async fn list_color_schemes_handler() -> Json<Vec<ColorSchemeResponse>> {
    Json(color_scheme::SCHEMES.iter().map(Into::into).collect())
}

async fn get_color_scheme_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ColorSchemeResponse>, AppError> {
    let stored = services::get_site_setting(&app_state.db_pool, COLOR_SCHEME_SETTING_KEY).await?;
    let scheme = color_scheme::resolve(stored.as_ref().map(|s| s.value.as_str()));
    Ok(Json(scheme.into()))
}

async fn update_color_scheme_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<UpdateColorSchemeRequest>,
) -> Result<Json<ColorSchemeResponse>, AppError> {
    let scheme = color_scheme::find_by_name(&payload.name)
        .ok_or_else(|| AppError::InvalidInput(tr("errors.unknown_color_scheme")))?;

    services::upsert_site_setting(
        &app_state.db_pool,
        COLOR_SCHEME_SETTING_KEY,
        scheme.name,
        None,
        Some(&authenticated_user.username),
    )
    .await?;
    info!(scheme = scheme.name, admin = %authenticated_user.username, "Color scheme changed.");
    Ok(Json(scheme.into()))
}

pub fn create_public_color_scheme_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/color-schemes", get(list_color_schemes_handler))
        .route("/color-scheme", get(get_color_scheme_handler))
}

pub fn create_admin_color_scheme_router() -> Router<Arc<AppState>> {
    Router::new().route("/color-scheme", put(update_color_scheme_handler))
}
