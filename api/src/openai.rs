//! OpenAI-compatible chat-completion client backing remote recommendations.

use std::time::Duration;

use async_trait::async_trait;
use breathwork_core::inference::{Completion, CompletionRequest, InferenceClient, InferenceError};
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> InferenceError {
        if err.is_timeout() {
            InferenceError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            InferenceError::Transport(err.to_string())
        }
    }
}

fn parse_completion(
    body: CompletionResponse,
    requested_model: &str,
) -> Result<Completion, InferenceError> {
    let text = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| InferenceError::InvalidResponse("no message content in choices".to_string()))?;

    Ok(Completion {
        text,
        model: body.model.unwrap_or_else(|| requested_model.to_string()),
        usage: body.usage,
    })
}

#[async_trait]
impl InferenceClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, InferenceError> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Chat completion request returned non-success status");
            return Err(if status == StatusCode::UNAUTHORIZED {
                InferenceError::Unauthorized(body)
            } else {
                InferenceError::Status {
                    status: status.as_u16(),
                    body,
                }
            });
        }

        let body = response
            .json::<CompletionResponse>()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    self.map_transport_error(err)
                } else {
                    InferenceError::InvalidResponse(err.to_string())
                }
            })?;

        parse_completion(body, &request.model)
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use breathwork_core::chat::ChatMessage;
    use breathwork_core::inference::{CompletionRequest, InferenceClient, InferenceError};
    use serde_json::json;

    use super::{CompletionResponse, OpenAiClient, parse_completion};

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind should succeed");
        let addr = listener.local_addr().expect("listener has an address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake provider should run");
        });
        addr
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::system("be kind"), ChatMessage::user("hi")],
            temperature: 0.3,
            max_tokens: Some(512),
        }
    }

    #[test]
    fn parse_completion_takes_first_choice() {
        let body: CompletionResponse = serde_json::from_value(json!({
            "model": "gpt-4o-mini-2024",
            "choices": [{"message": {"role": "assistant", "content": "Breathe in."}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3}
        }))
        .unwrap();
        let completion = parse_completion(body, "gpt-4o-mini").unwrap();
        assert_eq!(completion.text, "Breathe in.");
        assert_eq!(completion.model, "gpt-4o-mini-2024");
        assert_eq!(completion.usage.unwrap()["completion_tokens"], 3);
    }

    #[test]
    fn parse_completion_rejects_empty_choices() {
        let body: CompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        let err = parse_completion(body, "gpt-4o-mini").expect_err("no choices must fail");
        assert!(matches!(err, InferenceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn complete_sends_bearer_token_and_body() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "gpt-4o-mini");
                assert_eq!(body["messages"][0]["role"], "system");
                assert_eq!(body["max_tokens"], 512);
                Json(json!({
                    "model": "gpt-4o-mini",
                    "choices": [{"message": {"content": "Let's breathe."}}],
                    "usage": {"total_tokens": 12}
                }))
            }),
        );
        let addr = serve(app).await;

        let client =
            OpenAiClient::new(&format!("http://{addr}/v1/"), "sk-test", Duration::from_secs(5))
                .unwrap();
        let completion = client.complete(request()).await.expect("completion should succeed");
        assert_eq!(completion.text, "Let's breathe.");
    }

    #[tokio::test]
    async fn complete_maps_401_to_unauthorized() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
        );
        let addr = serve(app).await;

        let client =
            OpenAiClient::new(&format!("http://{addr}"), "sk-bad", Duration::from_secs(5)).unwrap();
        let err = client.complete(request()).await.expect_err("401 must fail");
        assert!(matches!(err, InferenceError::Unauthorized(ref body) if body == "bad key"));
    }

    #[tokio::test]
    async fn complete_maps_server_errors_to_status() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "overloaded") }),
        );
        let addr = serve(app).await;

        let client =
            OpenAiClient::new(&format!("http://{addr}"), "sk-test", Duration::from_secs(5)).unwrap();
        let err = client.complete(request()).await.expect_err("503 must fail");
        assert!(matches!(err, InferenceError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn complete_times_out_instead_of_hanging() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        );
        let addr = serve(app).await;

        let client =
            OpenAiClient::new(&format!("http://{addr}"), "sk-test", Duration::from_millis(200))
                .unwrap();
        let err = client.complete(request()).await.expect_err("slow provider must time out");
        assert!(matches!(err, InferenceError::Timeout { .. }));
    }
}
