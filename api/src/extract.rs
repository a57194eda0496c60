//! JSON extractor that reports malformed bodies as structured `AppError` responses.
//!
//! Use `AppJson<T>` instead of `axum::Json<T>` in handler signatures so that a bad
//! request body yields a `validation_failed` JSON error rather than axum's
//! plain-text rejection.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

/// Query-string counterpart of [`AppJson`].
pub struct AppQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => Err(map_query_rejection(rejection)),
        }
    }
}

pub fn map_query_rejection(rejection: QueryRejection) -> AppError {
    let body_text = rejection.body_text();
    let field_hint = extract_field_from_serde_message(&body_text);

    AppError::Validation {
        message: format!("Invalid query string: {body_text}"),
        field: Some(field_hint.unwrap_or("query".to_string())),
        received: None,
        docs_hint: Some(
            "Check the query parameters against the endpoint's schema (GET /api-doc/openapi.json)."
                .to_string(),
        ),
    }
}

pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    let body_text = rejection.body_text();
    let field_hint = extract_field_from_serde_message(&body_text);

    AppError::Validation {
        message: format!("Invalid request body: {body_text}"),
        field: Some(field_hint.unwrap_or("body".to_string())),
        received: None,
        docs_hint: Some(
            "Check the request body against the endpoint's schema (GET /api-doc/openapi.json)."
                .to_string(),
        ),
    }
}

/// Pull the field name out of serde's "missing field `x`" / "unknown field `x`" messages.
fn extract_field_from_serde_message(msg: &str) -> Option<String> {
    for marker in ["missing field `", "unknown field `"] {
        if let Some(start) = msg.find(marker) {
            let after = &msg[start + marker.len()..];
            if let Some(end) = after.find('`') {
                return Some(after[..end].to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_missing_field_name() {
        let msg = "Failed to deserialize the JSON body: missing field `messages` at line 1 column 2";
        assert_eq!(
            extract_field_from_serde_message(msg),
            Some("messages".to_string())
        );
    }

    #[test]
    fn extracts_unknown_field_name() {
        let msg = "unknown field `hold3`, expected one of `inhale`, `hold1`, `exhale`, `hold2`";
        assert_eq!(
            extract_field_from_serde_message(msg),
            Some("hold3".to_string())
        );
    }

    #[test]
    fn returns_none_for_type_errors() {
        let msg = "invalid type: string \"four\", expected f64";
        assert_eq!(extract_field_from_serde_message(msg), None);
    }
}
