//! Server-rendered admin pages for the user model: list, detail and add.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tera::Context;
use tracing::info;

use crate::db::services::ExtraFields;
use crate::services::validation;
use crate::web::error::FieldErrors;
use crate::web::extract::AppForm;
use crate::web::models::{AdminAddUserForm, AuthenticatedUser};
use crate::web::routes::paths;
use crate::web::{AppError, AppState};

pub fn create_admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(paths::ADMIN_USER_CHANGELIST, get(user_changelist))
        .route(paths::ADMIN_USER_ADD, get(user_add_form).post(user_add_submit))
        .route(paths::ADMIN_USER_CHANGE, get(user_change_page))
}

fn base_context(viewer: &AuthenticatedUser) -> Context {
    let mut context = Context::new();
    context.insert("current_user", &viewer.user().email);
    context
}

fn render(
    app_state: &AppState,
    template: &str,
    context: &Context,
) -> Result<Html<String>, AppError> {
    Ok(Html(app_state.templates.render(template, context)?))
}

async fn user_changelist(
    Extension(viewer): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let users = app_state.users.list_users().await?;
    let mut context = base_context(&viewer);
    context.insert("users", &users);
    render(&app_state, "admin/user_list.html", &context)
}

async fn user_change_page(
    Extension(viewer): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let user = app_state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with ID {user_id} doesn't exist.")))?;

    let mut context = base_context(&viewer);
    context.insert("has_usable_password", &user.has_usable_password());
    context.insert("user", &user);
    render(&app_state, "admin/user_change.html", &context)
}

fn add_form_context(
    viewer: &AuthenticatedUser,
    form: &AdminAddUserForm,
    errors: &FieldErrors,
) -> Context {
    let mut context = base_context(viewer);
    context.insert("email", &form.email);
    context.insert("name", &form.name);
    context.insert("errors", errors);
    context
}

async fn user_add_form(
    Extension(viewer): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let context = add_form_context(&viewer, &AdminAddUserForm::default(), &FieldErrors::new());
    render(&app_state, "admin/user_add.html", &context)
}

async fn user_add_submit(
    Extension(viewer): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    AppForm(form): AppForm<AdminAddUserForm>,
) -> Result<Response, AppError> {
    let mut errors = FieldErrors::new();
    validation::validate_email(&mut errors, "email", &form.email);
    validation::validate_name(&mut errors, "name", &form.name);
    validation::validate_password(&mut errors, "password1", &form.password1);
    if form.password1 != form.password2 {
        errors.add("password2", "The two password fields didn't match.");
    }
    if errors.get("email").is_none() && app_state.users.email_taken(&form.email).await? {
        errors.add("email", "User with this Email address already exists.");
    }

    if !errors.is_empty() {
        let context = add_form_context(&viewer, &form, &errors);
        let page = render(&app_state, "admin/user_add.html", &context)?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    let created = app_state
        .users
        .create_user(
            Some(&form.email),
            Some(&form.password1),
            ExtraFields::named(form.name.clone()),
        )
        .await?;
    info!(user_id = created.id, admin_id = viewer.id(), "User added through the admin site.");
    Ok(Redirect::to(&paths::admin_user_change(created.id)).into_response())
}
