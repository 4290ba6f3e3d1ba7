use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::info;

use crate::db::services;
use crate::services::validation::{self, REQUIRED};
use crate::web::error::FieldErrors;
use crate::web::extract::AppBody;
use crate::web::models::{AuthenticatedUser, CreateTagRequest, TagResponse};
use crate::web::routes::paths;
use crate::web::{AppError, AppState};

async fn create_tag_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    AppBody(payload): AppBody<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), AppError> {
    let mut errors = FieldErrors::new();
    match payload.name.as_deref() {
        Some(name) => validation::validate_required_text(&mut errors, "name", name),
        None => errors.add("name", REQUIRED),
    }
    errors.into_result()?;
    let name = payload.name.unwrap_or_default().trim().to_string();

    let tag_model = services::create_tag(&app_state.db_pool, authenticated_user.id(), &name).await?;
    info!(tag_id = tag_model.id, user_id = tag_model.user_id, "Tag created.");
    Ok((StatusCode::CREATED, Json(tag_model.into())))
}

async fn get_user_tags_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = services::get_tags_by_user_id(&app_state.db_pool, authenticated_user.id()).await?;
    Ok(Json(tags.into_iter().map(TagResponse::from).collect()))
}

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new().route(paths::TAGS, get(get_user_tags_handler).post(create_tag_handler))
}
