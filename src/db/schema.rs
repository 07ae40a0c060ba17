//! Table bootstrap and seed data.
//!
//! Tables are created from the entity definitions when they are missing, so a
//! fresh database (or the in-memory SQLite used by tests) is usable right
//! away. Seeding only fills tables that are still empty and never overwrites
//! admin edits.

use chrono::Utc;
use sea_orm::{
    sea_query::TableCreateStatement, ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityName, EntityTrait, PaginatorTrait, Schema, Set, TransactionTrait,
};
use serde_json::json;
use tracing::{debug, info};

use crate::db::entities::{
    admin_user, blog_post, callback_request, contact_info, customer, loyalty_program,
    portfolio_item, section, site_setting,
};
use crate::db::enums::LoyaltyTier;

/// Creates every table that does not exist yet.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, schema.create_table_from_entity(admin_user::Entity), admin_user::Entity).await?;
    create_table(db, schema.create_table_from_entity(section::Entity), section::Entity).await?;
    create_table(db, schema.create_table_from_entity(blog_post::Entity), blog_post::Entity).await?;
    create_table(db, schema.create_table_from_entity(portfolio_item::Entity), portfolio_item::Entity).await?;
    create_table(db, schema.create_table_from_entity(customer::Entity), customer::Entity).await?;
    create_table(db, schema.create_table_from_entity(callback_request::Entity), callback_request::Entity).await?;
    create_table(db, schema.create_table_from_entity(loyalty_program::Entity), loyalty_program::Entity).await?;
    create_table(db, schema.create_table_from_entity(contact_info::Entity), contact_info::Entity).await?;
    create_table(db, schema.create_table_from_entity(site_setting::Entity), site_setting::Entity).await?;

    info!("Database schema is ready.");
    Ok(())
}

async fn create_table<E: EntityName>(
    db: &DatabaseConnection,
    mut stmt: TableCreateStatement,
    entity: E,
) -> Result<(), DbErr> {
    stmt.if_not_exists();
    let backend = db.get_database_backend();
    db.execute(backend.build(&stmt)).await?;
    debug!(table = entity.table_name(), "Ensured table exists.");
    Ok(())
}

/// Inserts the default sections and loyalty tiers into empty tables.
pub async fn seed_defaults(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();

    if section::Entity::find().count(&txn).await? == 0 {
        let defaults = [
            (
                "hero",
                "Цветы, которые говорят за вас",
                Some("Авторские букеты и оформление событий с доставкой по городу"),
                None,
                Some("Заказать букет"),
            ),
            (
                "about",
                "О нашей мастерской",
                None,
                Some("Мы собираем букеты из свежих сезонных цветов и подбираем композицию под каждый повод."),
                None,
            ),
            (
                "loyalty",
                "Программа лояльности",
                Some("Копите покупки и получайте скидку до 15%"),
                None,
                Some("Узнать подробнее"),
            ),
        ];
        for (name, title, subtitle, content, button_text) in defaults {
            section::ActiveModel {
                name: Set(name.to_string()),
                title: Set(title.to_string()),
                subtitle: Set(subtitle.map(str::to_string)),
                content: Set(content.map(str::to_string)),
                button_text: Set(button_text.map(str::to_string)),
                image_url: Set(None),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        info!("Seeded default sections.");
    }

    if loyalty_program::Entity::find().count(&txn).await? == 0 {
        let tiers = [
            (
                LoyaltyTier::Beginner,
                "Новичок",
                "Стартовый уровень для всех клиентов",
                vec!["Поздравление с днём рождения", "Бесплатная открытка к букету"],
                0,
                Some(9_999),
                0,
            ),
            (
                LoyaltyTier::Silver,
                "Серебряный",
                "Для тех, кто радует близких регулярно",
                vec!["Скидка 5% на все букеты", "Бесплатная открытка к букету"],
                10_000,
                Some(29_999),
                5,
            ),
            (
                LoyaltyTier::Gold,
                "Золотой",
                "Для постоянных клиентов",
                vec!["Скидка 10% на все букеты", "Бесплатная доставка по городу"],
                30_000,
                Some(74_999),
                10,
            ),
            (
                LoyaltyTier::Platinum,
                "Платиновый",
                "Максимальные привилегии",
                vec![
                    "Скидка 15% на все букеты",
                    "Бесплатная доставка по городу",
                    "Персональный флорист",
                ],
                75_000,
                None,
                15,
            ),
        ];
        for (level, title, description, benefits, min_amount, max_amount, discount) in tiers {
            loyalty_program::ActiveModel {
                level: Set(level),
                title: Set(title.to_string()),
                description: Set(description.to_string()),
                benefits: Set(json!(benefits)),
                min_amount: Set(min_amount),
                max_amount: Set(max_amount),
                discount: Set(discount),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
        info!("Seeded default loyalty program tiers.");
    }

    txn.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{ConnectOptions, Database};

    async fn memory_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(opt).await.unwrap()
    }

    #[tokio::test]
    async fn schema_creation_is_repeatable() {
        let db = memory_db().await;
        create_schema(&db).await.unwrap();
        create_schema(&db).await.unwrap();
    }

    #[tokio::test]
    async fn seeding_fills_empty_tables_once() {
        let db = memory_db().await;
        create_schema(&db).await.unwrap();
        seed_defaults(&db).await.unwrap();
        seed_defaults(&db).await.unwrap();

        assert_eq!(section::Entity::find().count(&db).await.unwrap(), 3);
        let tiers = loyalty_program::Entity::find().all(&db).await.unwrap();
        assert_eq!(tiers.len(), 4);
        let platinum = tiers
            .iter()
            .find(|t| t.level == LoyaltyTier::Platinum)
            .unwrap();
        assert_eq!(platinum.max_amount, None);
        assert_eq!(platinum.benefit_list().len(), 3);
    }
}
