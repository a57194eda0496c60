use serde_json::json;

use crate::util::{api_request, usage_error};

pub async fn chat(api_url: &str, messages: Vec<String>, model: Option<String>) -> i32 {
    if messages.is_empty() {
        return usage_error("At least one --message is required", None);
    }
    let mut body = json!({ "messages": messages });
    if let Some(model) = model {
        body["model"] = json!(model);
    }
    api_request(api_url, reqwest::Method::POST, "/api/chat", Some(body), &[]).await
}

pub async fn chatbot(api_url: &str, lines: Vec<String>) -> i32 {
    if lines.is_empty() {
        return usage_error("At least one --line is required", None);
    }
    api_request(
        api_url,
        reqwest::Method::POST,
        "/api/chatbot",
        Some(json!({ "messages": lines })),
        &[],
    )
    .await
}
