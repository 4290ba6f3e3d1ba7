use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::db::entities::{auth_token, user};
use crate::web::error::AppError;

const KEY_BYTES: usize = 20;

/// 40 lowercase hex characters drawn from the thread-local CSPRNG.
pub fn generate_key() -> String {
    hex::encode(rand::random::<[u8; KEY_BYTES]>())
}

/// Returns the user's token, creating it on first use.
pub async fn get_or_create_token(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<auth_token::Model, AppError> {
    if let Some(existing) = find_token_for_user(db, user_id).await? {
        return Ok(existing);
    }

    let new_token = auth_token::ActiveModel {
        key: Set(generate_key()),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
    };

    match new_token.insert(db).await {
        Ok(token) => Ok(token),
        // A concurrent login for the same user won the insert; reuse its token.
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            find_token_for_user(db, user_id)
                .await?
                .ok_or_else(|| AppError::DatabaseError(err.to_string()))
        }
        Err(err) => Err(AppError::DatabaseError(err.to_string())),
    }
}

async fn find_token_for_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<auth_token::Model>, AppError> {
    let token = auth_token::Entity::find()
        .filter(auth_token::Column::UserId.eq(user_id))
        .one(db)
        .await?;
    Ok(token)
}

/// Resolves a presented key to its owner.
pub async fn find_user_by_token(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<user::Model>, AppError> {
    let found = auth_token::Entity::find_by_id(key.to_string())
        .find_also_related(user::Entity)
        .one(db)
        .await?;
    Ok(found.and_then(|(_, user)| user))
}
