use chrono::Utc;
use sea_orm::{
    sea_query::OnConflict, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};

use crate::db::entities::site_setting;

// --- Site Settings Service Functions ---

pub async fn get_all_site_settings(
    db: &DatabaseConnection,
) -> Result<Vec<site_setting::Model>, DbErr> {
    site_setting::Entity::find()
        .order_by_asc(site_setting::Column::Key)
        .all(db)
        .await
}

/// Retrieves a setting by its key.
pub async fn get_site_setting(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<site_setting::Model>, DbErr> {
    site_setting::Entity::find_by_id(key.to_owned()).one(db).await
}

/// Creates or updates a setting, recording which admin wrote it.
pub async fn upsert_site_setting(
    db: &DatabaseConnection,
    key: &str,
    value: &str,
    description: Option<String>,
    updated_by: Option<&str>,
) -> Result<site_setting::Model, DbErr> {
    let keep_description = description.is_none();
    let model = site_setting::ActiveModel {
        key: Set(key.to_owned()),
        value: Set(value.to_owned()),
        description: Set(description),
        updated_by: Set(updated_by.map(str::to_owned)),
        updated_at: Set(Utc::now()),
    };

    let mut on_conflict = OnConflict::column(site_setting::Column::Key);
    on_conflict.update_columns([
        site_setting::Column::Value,
        site_setting::Column::UpdatedBy,
        site_setting::Column::UpdatedAt,
    ]);
    // an omitted description leaves the stored one alone
    if !keep_description {
        on_conflict.update_column(site_setting::Column::Description);
    }

    site_setting::Entity::insert(model)
        .on_conflict(on_conflict)
        .exec(db)
        .await?;

    get_site_setting(db, key)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("site setting {key}")))
}

pub async fn delete_site_setting(db: &DatabaseConnection, key: &str) -> Result<bool, DbErr> {
    let result = site_setting::Entity::delete_by_id(key.to_owned())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}
