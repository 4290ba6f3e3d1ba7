use axum::{
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::web::error::AppError;

/// Request body accepted as either JSON or a urlencoded form, chosen by
/// `Content-Type`. Any other media type is answered with 415.
#[derive(Debug)]
pub struct AppBody<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
}

fn body_kind(headers: &HeaderMap) -> Result<BodyKind, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "application/json" => Ok(BodyKind::Json),
        "application/x-www-form-urlencoded" => Ok(BodyKind::Form),
        other if other.starts_with("application/") && other.ends_with("+json") => {
            Ok(BodyKind::Json)
        }
        _ => Err(AppError::UnsupportedMediaType(content_type.to_string())),
    }
}

impl<T, S> FromRequest<S> for AppBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers())? {
            BodyKind::Json => {
                let Json(value) = Json::<T>::from_request(req, state).await?;
                Ok(Self(value))
            }
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state).await?;
                Ok(Self(value))
            }
        }
    }
}

/// `axum::Form` whose rejections become 400 responses in the service's error format.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct AppForm<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn content_type(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn picks_parser_from_content_type() {
        assert_eq!(body_kind(&content_type("application/json")).unwrap(), BodyKind::Json);
        assert_eq!(
            body_kind(&content_type("application/json; charset=utf-8")).unwrap(),
            BodyKind::Json
        );
        assert_eq!(
            body_kind(&content_type("application/problem+json")).unwrap(),
            BodyKind::Json
        );
        assert_eq!(
            body_kind(&content_type("Application/X-WWW-Form-Urlencoded")).unwrap(),
            BodyKind::Form
        );
    }

    #[test]
    fn other_media_types_are_unsupported() {
        assert!(matches!(
            body_kind(&content_type("text/plain")),
            Err(AppError::UnsupportedMediaType(ref t)) if t == "text/plain"
        ));
        assert!(matches!(
            body_kind(&HeaderMap::new()),
            Err(AppError::UnsupportedMediaType(_))
        ));
    }
}
