use chrono::Utc;
use sea_orm::{sea_query::OnConflict, DatabaseConnection, DbErr, EntityTrait, Set};

use crate::db::entities::contact_info::{self, SINGLETON_ID};
use crate::web::models::settings_models::UpdateContactInfoRequest;

pub async fn get_contact_info(
    db: &DatabaseConnection,
) -> Result<Option<contact_info::Model>, DbErr> {
    contact_info::Entity::find_by_id(SINGLETON_ID).one(db).await
}

/// Writes the singleton contact row, inserting it on first save.
pub async fn upsert_contact_info(
    db: &DatabaseConnection,
    req: UpdateContactInfoRequest,
) -> Result<contact_info::Model, DbErr> {
    let model = contact_info::ActiveModel {
        id: Set(SINGLETON_ID),
        phone: Set(req.phone.trim().to_owned()),
        email: Set(req.email),
        address: Set(req.address),
        working_hours: Set(req.working_hours),
        social_media: Set(req.social_media),
        additional_info: Set(req.additional_info),
        updated_at: Set(Utc::now()),
    };
    contact_info::Entity::insert(model)
        .on_conflict(
            OnConflict::column(contact_info::Column::Id)
                .update_columns([
                    contact_info::Column::Phone,
                    contact_info::Column::Email,
                    contact_info::Column::Address,
                    contact_info::Column::WorkingHours,
                    contact_info::Column::SocialMedia,
                    contact_info::Column::AdditionalInfo,
                    contact_info::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    get_contact_info(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("contact_info".to_string()))
}
