use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::db::entities::user;
use crate::services::password::PasswordHasher;
use crate::web::error::{AppError, FieldErrors};

/// Optional attributes accepted by [`UserManager::create_user`].
#[derive(Debug, Clone)]
pub struct ExtraFields {
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
}

impl Default for ExtraFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            is_active: true,
            is_staff: false,
        }
    }
}

impl ExtraFields {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A partial update of the mutable profile fields; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Canonical form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Creates and looks up accounts, keeping email normalization and password
/// hashing in one place.
#[derive(Clone)]
pub struct UserManager {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl UserManager {
    pub fn new(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    /// Persists a new account. A missing password leaves the account without a
    /// usable password.
    pub async fn create_user(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<user::Model, AppError> {
        let email = email
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                AppError::Validation(FieldErrors::single(
                    "email",
                    "Users must have an email address.",
                ))
            })?;

        let password_hash = password.map(|raw| self.hasher.hash(raw)).transpose()?;

        let now = Utc::now();
        let new_user = user::ActiveModel {
            email: Set(email),
            name: Set(extra.name),
            password_hash: Set(password_hash),
            is_active: Set(extra.is_active),
            is_staff: Set(extra.is_staff),
            is_superuser: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user_model = new_user.insert(&self.db).await?;
        info!(user_id = user_model.id, "User created.");
        Ok(user_model)
    }

    pub async fn create_superuser(
        &self,
        email: Option<&str>,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<user::Model, AppError> {
        let created = self.create_user(email, password, extra).await?;

        let mut superuser = created.into_active_model();
        superuser.is_staff = Set(true);
        superuser.is_superuser = Set(true);
        superuser.updated_at = Set(Utc::now());
        let superuser = superuser.update(&self.db).await?;

        info!(user_id = superuser.id, "User promoted to superuser.");
        Ok(superuser)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, AppError> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?;
        Ok(found)
    }

    pub async fn find_by_id(&self, user_id: i32) -> Result<Option<user::Model>, AppError> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?)
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    pub async fn list_users(&self) -> Result<Vec<user::Model>, AppError> {
        let users = user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    /// Applies `changes` to `user` and returns the stored row.
    pub async fn update_profile(
        &self,
        user: user::Model,
        changes: ProfileChanges,
    ) -> Result<user::Model, AppError> {
        if changes.name.is_none() && changes.email.is_none() && changes.password.is_none() {
            return Ok(user);
        }

        let mut active = user.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(email) = changes.email {
            active.email = Set(normalize_email(&email));
        }
        if let Some(password) = changes.password {
            active.password_hash = Set(Some(self.hasher.hash(&password)?));
        }
        active.updated_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }
}
