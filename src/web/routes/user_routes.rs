use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use crate::services::auth_service;
use crate::web::extract::AppBody;
use crate::web::models::{
    AuthenticatedUser, RegisterRequest, TokenRequest, TokenResponse, UpdateProfileRequest,
    UserResponse,
};
use crate::web::routes::paths;
use crate::web::{AppError, AppState};

/// Registration and token issuance; no credentials required.
pub fn create_public_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(paths::USER_CREATE, post(register_handler))
        .route(paths::USER_TOKEN, post(token_handler))
}

/// The caller's own profile. Authentication is layered on by the caller so that
/// it also covers methods this router does not serve.
pub fn create_profile_router() -> Router<Arc<AppState>> {
    Router::new().route(
        paths::USER_ME,
        get(get_profile_handler)
            .patch(patch_profile_handler)
            .put(put_profile_handler),
    )
}

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    AppBody(payload): AppBody<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = auth_service::register_user(&app_state.users, payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn token_handler(
    State(app_state): State<Arc<AppState>>,
    AppBody(payload): AppBody<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = auth_service::obtain_token(&app_state.db_pool, &app_state.users, payload).await?;
    Ok(Json(token))
}

async fn get_profile_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
) -> Json<UserResponse> {
    Json(auth_user.0.into())
}

async fn patch_profile_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    AppBody(payload): AppBody<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    update_profile(&app_state, auth_user, payload, true).await
}

async fn put_profile_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    AppBody(payload): AppBody<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    update_profile(&app_state, auth_user, payload, false).await
}

async fn update_profile(
    app_state: &AppState,
    auth_user: AuthenticatedUser,
    payload: UpdateProfileRequest,
    partial: bool,
) -> Result<Json<UserResponse>, AppError> {
    let changes = auth_service::validate_profile_update(
        &app_state.users,
        auth_user.user(),
        payload,
        partial,
    )
    .await?;
    let updated = app_state.users.update_profile(auth_user.0, changes).await?;
    Ok(Json(updated.into()))
}
