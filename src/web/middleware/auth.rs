use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::db::services::token_service;
use crate::web::models::AuthenticatedUser;
use crate::web::{error::AppError, AppState};

const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Why a request could not be tied to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingCredentials,
    MalformedHeader,
    InvalidToken,
    InactiveUser,
}

impl AuthFailure {
    pub fn message(self) -> &'static str {
        match self {
            AuthFailure::MissingCredentials => "Authentication credentials were not provided.",
            AuthFailure::MalformedHeader => "Invalid token header.",
            AuthFailure::InvalidToken => "Invalid token.",
            AuthFailure::InactiveUser => "User inactive or deleted.",
        }
    }
}

/// Extracts the key from `Authorization: Token <key>` (or `Bearer <key>`).
///
/// Headers using another scheme are ignored, as if no credentials were sent.
pub fn token_from_headers(headers: &HeaderMap) -> Result<Option<String>, AuthFailure> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthFailure::MalformedHeader)?;
    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or_default();
    if !TOKEN_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return Ok(None);
    }
    match (parts.next(), parts.next()) {
        (Some(key), None) => Ok(Some(key.to_string())),
        _ => Err(AuthFailure::MalformedHeader),
    }
}

async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AppError> {
    let outcome = match token_from_headers(headers) {
        Ok(Some(key)) => match token_service::find_user_by_token(&state.db_pool, &key).await? {
            Some(user) if user.is_active => Ok(AuthenticatedUser(user)),
            Some(_) => Err(AuthFailure::InactiveUser),
            None => Err(AuthFailure::InvalidToken),
        },
        Ok(None) => Err(AuthFailure::MissingCredentials),
        Err(failure) => Err(failure),
    };

    outcome.map_err(|failure| {
        if failure != AuthFailure::MissingCredentials {
            warn!(reason = ?failure, "Token authentication failed.");
        }
        AppError::Unauthorized(failure.message().to_string())
    })
}

/// Requires a valid token; failures answer 401 with a `Token` challenge.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Requires a valid token; failures answer 403 without a challenge.
pub async fn require_user(
    State(state): State<Arc<AppState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, req.headers())
        .await
        .map_err(|err| match err {
            AppError::Unauthorized(msg) => AppError::Forbidden(msg),
            other => other,
        })?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Must run after [`require_token`]; rejects non-staff accounts with 403.
pub async fn require_staff(req: Request<AxumBody>, next: Next) -> Result<Response, AppError> {
    let is_staff = req
        .extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.user().is_staff && user.user().is_active)
        .unwrap_or(false);
    if !is_staff {
        return Err(AppError::Forbidden(
            "You do not have permission to perform this action.".to_string(),
        ));
    }
    Ok(next.run(req).await)
}
