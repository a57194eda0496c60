use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use breathwork_core::engine::RecommendError;
use breathwork_core::error::{self, ApiError, CatalogError, ValidationError};
use breathwork_core::inference::InferenceError;

/// Internal error type that converts to structured API responses
#[derive(Debug)]
pub enum AppError {
    /// Validation error (400)
    Validation {
        message: String,
        field: Option<String>,
        received: Option<serde_json::Value>,
        docs_hint: Option<String>,
    },
    /// Unknown resource (404)
    NotFound { resource: String },
    /// Remote inference failed (502)
    Upstream(String),
    /// Remote inference timed out (504)
    UpstreamTimeout(String),
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = uuid::Uuid::now_v7().to_string();

        let (status, api_error) = match self {
            AppError::Validation {
                message,
                field,
                received,
                docs_hint,
            } => (
                StatusCode::BAD_REQUEST,
                ApiError {
                    error: error::codes::VALIDATION_FAILED.to_string(),
                    message,
                    field,
                    received,
                    request_id,
                    docs_hint,
                },
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                ApiError {
                    error: error::codes::NOT_FOUND.to_string(),
                    message: format!("{resource} not found"),
                    field: None,
                    received: None,
                    request_id,
                    docs_hint: Some("GET /api/catalog lists every known emotion label.".to_string()),
                },
            ),
            AppError::Upstream(msg) => {
                tracing::error!(request_id = %request_id, "Inference provider error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ApiError {
                        error: error::codes::UPSTREAM_ERROR.to_string(),
                        message: "The recommendation provider failed".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
            AppError::UpstreamTimeout(msg) => {
                tracing::error!(request_id = %request_id, "Inference provider timeout: {}", msg);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    ApiError {
                        error: error::codes::UPSTREAM_TIMEOUT.to_string(),
                        message: "The recommendation provider did not answer in time".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: Some("Retry later; the request was not retried automatically.".to_string()),
                    },
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(request_id = %request_id, "Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError {
                        error: error::codes::INTERNAL_ERROR.to_string(),
                        message: "An internal error occurred".to_string(),
                        field: None,
                        received: None,
                        request_id,
                        docs_hint: None,
                    },
                )
            }
        };

        (status, Json(api_error)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation {
            message: err.to_string(),
            field: Some(err.field().to_string()),
            received: serde_json::Number::from_f64(err.received()).map(serde_json::Value::Number),
            docs_hint: Some(
                "Phase durations must be >= 0 with a total > 0; box_scale and cycle_seconds must be > 0."
                    .to_string(),
            ),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(label) => AppError::NotFound {
                resource: format!("emotion '{label}'"),
            },
        }
    }
}

impl From<RecommendError> for AppError {
    fn from(err: RecommendError) -> Self {
        match err {
            RecommendError::Inference(err @ InferenceError::Timeout { .. }) => {
                AppError::UpstreamTimeout(err.to_string())
            }
            RecommendError::Inference(err) => AppError::Upstream(err.to_string()),
            RecommendError::Encode(err) => AppError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use breathwork_core::engine::RecommendError;
    use breathwork_core::error::{CatalogError, ValidationError};
    use breathwork_core::inference::InferenceError;

    use super::AppError;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        (status, serde_json::from_slice(&bytes).expect("body should be json"))
    }

    #[tokio::test]
    async fn validation_error_maps_to_400_with_field() {
        let err = AppError::from(ValidationError::NegativePhase {
            field: "exhale",
            value: -2.0,
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_failed");
        assert_eq!(body["field"], "exhale");
        assert_eq!(body["received"], -2.0);
    }

    #[tokio::test]
    async fn unknown_label_maps_to_404() {
        let err = AppError::from(CatalogError::NotFound("Bored".to_string()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn inference_timeout_maps_to_504_and_other_failures_to_502() {
        let timeout = AppError::from(RecommendError::Inference(InferenceError::Timeout {
            seconds: 30,
        }));
        assert_eq!(body_json(timeout).await.0, StatusCode::GATEWAY_TIMEOUT);

        let status = AppError::from(RecommendError::Inference(InferenceError::Status {
            status: 500,
            body: "boom".to_string(),
        }));
        let (code, body) = body_json(status).await;
        assert_eq!(code, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "upstream_error");
        assert!(!body["message"].as_str().unwrap().contains("boom"));
    }
}
