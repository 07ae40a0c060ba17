use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::entities::blog_post;
use crate::db::services;
use crate::web::error::AppError;
use crate::web::extract::ValidatedJson;
use crate::web::models::content_models::{
    BlogPostQuery, CreateBlogPostRequest, UpdateBlogPostRequest,
};
use crate::web::AppState;

async fn list_blog_posts_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<BlogPostQuery>,
) -> Result<Json<Vec<blog_post::Model>>, AppError> {
    let posts = services::get_blog_posts(&app_state.db_pool, &query).await?;
    Ok(Json(posts))
}

async fn get_blog_post_handler(
    State(app_state): State<Arc<AppState>>,
    Path(post_id): Path<i32>,
) -> Result<Json<blog_post::Model>, AppError> {
    services::get_blog_post_by_id(&app_state.db_pool, post_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("blog_post"))
}

async fn create_blog_post_handler(
    State(app_state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateBlogPostRequest>,
) -> Result<(StatusCode, Json<blog_post::Model>), AppError> {
    let created = services::create_blog_post(&app_state.db_pool, payload).await?;
    info!(post_id = created.id, published = created.published, "Blog post created.");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_blog_post_handler(
    State(app_state): State<Arc<AppState>>,
    Path(post_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateBlogPostRequest>,
) -> Result<Json<blog_post::Model>, AppError> {
    services::update_blog_post(&app_state.db_pool, post_id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("blog_post"))
}

async fn delete_blog_post_handler(
    State(app_state): State<Arc<AppState>>,
    Path(post_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if services::delete_blog_post(&app_state.db_pool, post_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("blog_post"))
    }
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_blog_posts_handler))
        .route("/{post_id}", get(get_blog_post_handler))
}

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new().route("/", post(create_blog_post_handler)).route(
        "/{post_id}",
        put(update_blog_post_handler)
            .patch(update_blog_post_handler)
            .delete(delete_blog_post_handler),
    )
}
