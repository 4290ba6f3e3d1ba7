use serde::{Deserialize, Serialize};

use crate::db::entities::{tag, user};

// Request fields are optional so that absent values surface as field errors
// instead of extractor rejections.

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account; the password never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

impl From<tag::Model> for TagResponse {
    fn from(tag: tag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Form posted by the admin "add user" page.
#[derive(Debug, Default, Deserialize)]
pub struct AdminAddUserForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// The account resolved from the request's token, passed as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub user::Model);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn user(&self) -> &user::Model {
        &self.0
    }
}
