use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::db::entities::tag;

/// Creates a new tag owned by `user_id`.
pub async fn create_tag(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
) -> Result<tag::Model, DbErr> {
    let new_tag = tag::ActiveModel {
        user_id: Set(user_id),
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    new_tag.insert(db).await
}

/// Retrieves every tag owned by `user_id`, ordered by name descending.
pub async fn get_tags_by_user_id(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<tag::Model>, DbErr> {
    tag::Entity::find()
        .filter(tag::Column::UserId.eq(user_id))
        .order_by_desc(tag::Column::Name)
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await
}
