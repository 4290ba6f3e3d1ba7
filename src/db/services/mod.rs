pub mod tag_service;
pub mod token_service;
pub mod user_service;

pub use tag_service::*;
pub use token_service::*;
pub use user_service::{normalize_email, ExtraFields, ProfileChanges, UserManager};
