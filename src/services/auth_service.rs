use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::db::entities::user;
use crate::db::services::{token_service, ExtraFields, ProfileChanges, UserManager};
use crate::services::validation::{self, REQUIRED};
use crate::web::error::{AppError, FieldErrors};
use crate::web::models::{
    RegisterRequest, TokenRequest, TokenResponse, UpdateProfileRequest, UserResponse,
};

const DUPLICATE_EMAIL: &str = "user with this email already exists.";

pub async fn register_user(
    users: &UserManager,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    let mut errors = FieldErrors::new();
    match req.email.as_deref() {
        Some(email) => validation::validate_email(&mut errors, "email", email),
        None => errors.add("email", REQUIRED),
    }
    match req.password.as_deref() {
        Some(password) => validation::validate_password(&mut errors, "password", password),
        None => errors.add("password", REQUIRED),
    }
    let name = req.name.unwrap_or_default();
    validation::validate_name(&mut errors, "name", &name);
    let password = req.password.as_deref().map(str::trim);

    if let Some(email) = req.email.as_deref() {
        if errors.get("email").is_none() && users.email_taken(email).await? {
            errors.add("email", DUPLICATE_EMAIL);
        }
    }
    errors.into_result()?;

    let user_model = users
        .create_user(req.email.as_deref(), password, ExtraFields::named(name))
        .await?;
    info!(user_id = user_model.id, "Registered new user.");
    Ok(user_model.into())
}

/// Exchanges valid credentials for the user's token.
///
/// Unknown emails, wrong passwords and inactive accounts are indistinguishable
/// to the caller.
pub async fn obtain_token(
    db: &DatabaseConnection,
    users: &UserManager,
    req: TokenRequest,
) -> Result<TokenResponse, AppError> {
    let mut errors = FieldErrors::new();
    let email = required_text(&mut errors, "email", req.email);
    let password = required_text(&mut errors, "password", req.password);
    errors.into_result()?;

    let user = authenticate(users, &email, &password)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let token = token_service::get_or_create_token(db, user.id).await?;
    info!(user_id = user.id, "Issued auth token.");
    Ok(TokenResponse { token: token.key })
}

/// Returns the account only if the credentials match an active user.
pub async fn authenticate(
    users: &UserManager,
    email: &str,
    password: &str,
) -> Result<Option<user::Model>, AppError> {
    let Some(user) = users.find_by_email(email).await? else {
        warn!("Token requested for an unknown email.");
        return Ok(None);
    };
    if !user.is_active || !user.check_password(password) {
        warn!(user_id = user.id, "Token requested with invalid credentials.");
        return Ok(None);
    }
    Ok(Some(user))
}

/// Validates a profile update against `current` and converts it into changes.
///
/// With `partial == false` every required field must be present.
pub async fn validate_profile_update(
    users: &UserManager,
    current: &user::Model,
    req: UpdateProfileRequest,
    partial: bool,
) -> Result<ProfileChanges, AppError> {
    let mut errors = FieldErrors::new();

    if let Some(name) = req.name.as_deref() {
        validation::validate_name(&mut errors, "name", name);
    }
    match req.email.as_deref() {
        Some(email) => {
            validation::validate_email(&mut errors, "email", email);
            let normalized = crate::db::services::normalize_email(email);
            if errors.get("email").is_none()
                && normalized != current.email
                && users.email_taken(&normalized).await?
            {
                errors.add("email", DUPLICATE_EMAIL);
            }
        }
        None if !partial => errors.add("email", REQUIRED),
        None => {}
    }
    match req.password.as_deref() {
        Some(password) => validation::validate_password(&mut errors, "password", password),
        None if !partial => errors.add("password", REQUIRED),
        None => {}
    }
    errors.into_result()?;

    Ok(ProfileChanges {
        name: req.name,
        email: req.email,
        password: req.password.map(|p| p.trim().to_string()),
    })
}

fn required_text(errors: &mut FieldErrors, field: &str, value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        Some(_) => {
            errors.add(field, validation::BLANK);
            String::new()
        }
        None => {
            errors.add(field, REQUIRED);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::services::password::PasswordHasher;

    async fn setup() -> (DatabaseConnection, UserManager) {
        let db = test_connection().await;
        let users = UserManager::new(db.clone(), PasswordHasher::new(4));
        (db, users)
    }

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: Some(email.into()),
            password: Some(password.into()),
            name: None,
        }
    }

    #[tokio::test]
    async fn registration_rejects_short_password_without_creating_user() {
        let (_db, users) = setup().await;
        let result = register_user(&users, register("testuser@npminit.com", "test")).await;

        match result {
            Err(AppError::Validation(errors)) => assert!(errors.get("password").is_some()),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(!users.email_taken("testuser@npminit.com").await.unwrap());
    }

    #[tokio::test]
    async fn registration_trims_password_whitespace() {
        let (_db, users) = setup().await;
        register_user(&users, register("padded@npminit.com", "  Testpass,123  ")).await.unwrap();

        let stored = users.find_by_email("padded@npminit.com").await.unwrap().unwrap();
        assert!(stored.check_password("Testpass,123"));

        let blank = register_user(&users, register("blank@npminit.com", "     ")).await;
        match blank {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("password"), Some(&[validation::BLANK.to_string()][..]))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn registration_rejects_existing_email() {
        let (_db, users) = setup().await;
        register_user(&users, register("testuser@npminit.com", "Testpass,123")).await.unwrap();

        let again = register_user(&users, register("TestUser@npminit.com", "Testpass,123")).await;
        match again {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("email"), Some(&[DUPLICATE_EMAIL.to_string()][..]))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn token_is_issued_only_for_matching_credentials() {
        let (db, users) = setup().await;
        register_user(&users, register("testuser@npminit.com", "Testpass,123")).await.unwrap();

        let wrong = obtain_token(
            &db,
            &users,
            TokenRequest {
                email: Some("testuser@npminit.com".into()),
                password: Some("wrong".into()),
            },
        )
        .await;
        assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

        let unknown = obtain_token(
            &db,
            &users,
            TokenRequest {
                email: Some("nobody@npminit.com".into()),
                password: Some("Testpass,123".into()),
            },
        )
        .await;
        assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

        let ok = obtain_token(
            &db,
            &users,
            TokenRequest {
                email: Some("TESTUSER@npminit.com".into()),
                password: Some("Testpass,123".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(ok.token.len(), 40);
    }

    #[tokio::test]
    async fn inactive_users_cannot_obtain_tokens() {
        let (db, users) = setup().await;
        users
            .create_user(
                Some("inactive@npminit.com"),
                Some("Testpass,123"),
                ExtraFields {
                    is_active: false,
                    ..ExtraFields::default()
                },
            )
            .await
            .unwrap();

        let result = obtain_token(
            &db,
            &users,
            TokenRequest {
                email: Some("inactive@npminit.com".into()),
                password: Some("Testpass,123".into()),
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn missing_password_is_a_field_error() {
        let (db, users) = setup().await;
        let result = obtain_token(
            &db,
            &users,
            TokenRequest {
                email: Some("testuser@npminit.com".into()),
                password: None,
            },
        )
        .await;
        match result {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.get("password"), Some(&[REQUIRED.to_string()][..]))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn full_update_requires_email_and_password() {
        let (_db, users) = setup().await;
        let user = users
            .create_user(Some("me@npminit.com"), Some("Testpass,123"), ExtraFields::default())
            .await
            .unwrap();

        let req = UpdateProfileRequest {
            name: Some("Only Name".into()),
            ..UpdateProfileRequest::default()
        };
        match validate_profile_update(&users, &user, req, false).await {
            Err(AppError::Validation(errors)) => {
                assert!(errors.get("email").is_some());
                assert!(errors.get("password").is_some());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn keeping_own_email_is_not_a_duplicate() {
        let (_db, users) = setup().await;
        let user = users
            .create_user(Some("me@npminit.com"), Some("Testpass,123"), ExtraFields::default())
            .await
            .unwrap();

        let req = UpdateProfileRequest {
            email: Some("ME@npminit.com".into()),
            ..UpdateProfileRequest::default()
        };
        let changes = validate_profile_update(&users, &user, req, true).await.unwrap();
        assert_eq!(changes.email.as_deref(), Some("ME@npminit.com"));
    }
}
