pub mod catalog;
pub mod chat;
pub mod config;
pub mod health;
pub mod patterns;

#[cfg(test)]
pub mod test_support {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use breathwork_core::engine::RecommendationEngine;
    use tower::ServiceExt;

    use crate::state::AppState;

    pub fn local_state() -> AppState {
        AppState::new(RecommendationEngine::local())
    }

    /// Drive one request through `app` and decode the JSON response body.
    pub async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        let response = app.oneshot(request).await.expect("request should succeed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body should be json")
        };
        (status, value)
    }
}
