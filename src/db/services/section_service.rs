use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::section;
use crate::web::models::content_models::{CreateSectionRequest, UpdateSectionRequest};

/// Result of writing a section by name.
#[derive(Debug)]
pub enum SectionUpsert {
    Created(section::Model),
    Updated(section::Model),
    /// The section does not exist and the payload has no title to create it with.
    MissingTitle,
}

pub async fn get_all_sections(db: &DatabaseConnection) -> Result<Vec<section::Model>, DbErr> {
    section::Entity::find()
        .order_by_asc(section::Column::Id)
        .all(db)
        .await
}

pub async fn get_section_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<section::Model>, DbErr> {
    section::Entity::find()
        .filter(section::Column::Name.eq(name))
        .one(db)
        .await
}

/// Inserts a section; a duplicate name surfaces as a unique-constraint error.
pub async fn create_section(
    db: &DatabaseConnection,
    req: CreateSectionRequest,
) -> Result<section::Model, DbErr> {
    section::ActiveModel {
        name: Set(req.name),
        title: Set(req.title),
        subtitle: Set(req.subtitle),
        content: Set(req.content),
        button_text: Set(req.button_text),
        image_url: Set(req.image_url),
        updated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Applies a partial update to the named section, creating it when missing.
pub async fn upsert_section(
    db: &DatabaseConnection,
    name: &str,
    req: UpdateSectionRequest,
) -> Result<SectionUpsert, DbErr> {
    let Some(existing) = get_section_by_name(db, name).await? else {
        let Some(title) = req.title else {
            return Ok(SectionUpsert::MissingTitle);
        };
        let created = create_section(
            db,
            CreateSectionRequest {
                name: name.to_owned(),
                title,
                subtitle: req.subtitle.flatten(),
                content: req.content.flatten(),
                button_text: req.button_text.flatten(),
                image_url: req.image_url.flatten(),
            },
        )
        .await?;
        return Ok(SectionUpsert::Created(created));
    };

    let mut active = existing.into_active_model();
    if let Some(title) = req.title {
        active.title = Set(title);
    }
    if let Some(subtitle) = req.subtitle {
        active.subtitle = Set(subtitle);
    }
    if let Some(content) = req.content {
        active.content = Set(content);
    }
    if let Some(button_text) = req.button_text {
        active.button_text = Set(button_text);
    }
    if let Some(image_url) = req.image_url {
        active.image_url = Set(image_url);
    }
    active.updated_at = Set(Utc::now());
    Ok(SectionUpsert::Updated(active.update(db).await?))
}

/// Returns `false` when no section has that name.
pub async fn delete_section(db: &DatabaseConnection, name: &str) -> Result<bool, DbErr> {
    let result = section::Entity::delete_many()
        .filter(section::Column::Name.eq(name))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
