use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// `None` marks an unusable password; such accounts cannot log in with credentials.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tag::Entity")]
    Tags,

    #[sea_orm(has_one = "super::auth_token::Entity")]
    AuthToken,
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::auth_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Verifies `raw` against the stored bcrypt hash.
    pub fn check_password(&self, raw: &str) -> bool {
        match self.password_hash.as_deref() {
            Some(hash) => bcrypt::verify(raw, hash).unwrap_or(false),
            None => false,
        }
    }

    pub fn has_usable_password(&self) -> bool {
        self.password_hash.is_some()
    }
}
