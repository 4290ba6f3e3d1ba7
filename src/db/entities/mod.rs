//! SeaORM entities mapping the service's tables.

pub mod auth_token;
pub mod tag;
pub mod user;

pub mod prelude {
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;

    pub use super::tag::ActiveModel as TagActiveModel;
    pub use super::tag::Column as TagColumn;
    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;

    pub use super::auth_token::ActiveModel as AuthTokenActiveModel;
    pub use super::auth_token::Column as AuthTokenColumn;
    pub use super::auth_token::Entity as AuthToken;
    pub use super::auth_token::Model as AuthTokenModel;
}
