use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::blog_post;
use crate::web::models::content_models::{
    BlogPostQuery, CreateBlogPostRequest, UpdateBlogPostRequest,
};

/// Lists posts newest first, optionally filtered by publication state and category.
pub async fn get_blog_posts(
    db: &DatabaseConnection,
    query: &BlogPostQuery,
) -> Result<Vec<blog_post::Model>, DbErr> {
    let mut select = blog_post::Entity::find();
    if let Some(published) = query.published {
        select = select.filter(blog_post::Column::Published.eq(published));
    }
    if let Some(category) = &query.category {
        select = select.filter(blog_post::Column::Category.eq(category.as_str()));
    }
    select
        .order_by_desc(blog_post::Column::CreatedAt)
        .order_by_desc(blog_post::Column::Id)
        .all(db)
        .await
}

pub async fn get_blog_post_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<blog_post::Model>, DbErr> {
    blog_post::Entity::find_by_id(id).one(db).await
}

pub async fn create_blog_post(
    db: &DatabaseConnection,
    req: CreateBlogPostRequest,
) -> Result<blog_post::Model, DbErr> {
    let now = Utc::now();
    blog_post::ActiveModel {
        title: Set(req.title),
        excerpt: Set(req.excerpt),
        content: Set(req.content),
        category: Set(req.category),
        image_url: Set(req.image_url),
        published: Set(req.published),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn update_blog_post(
    db: &DatabaseConnection,
    id: i32,
    req: UpdateBlogPostRequest,
) -> Result<Option<blog_post::Model>, DbErr> {
    let Some(post) = get_blog_post_by_id(db, id).await? else {
        return Ok(None);
    };

    let mut active = post.into_active_model();
    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(excerpt) = req.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(content) = req.content {
        active.content = Set(content);
    }
    if let Some(category) = req.category {
        active.category = Set(category);
    }
    if let Some(image_url) = req.image_url {
        active.image_url = Set(image_url);
    }
    if let Some(published) = req.published {
        active.published = Set(published);
    }
    active.updated_at = Set(Utc::now());
    active.update(db).await.map(Some)
}

pub async fn delete_blog_post(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let result = blog_post::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected > 0)
}
