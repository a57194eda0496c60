use serde_json::json;

use crate::util::{api_request, usage_error};

pub async fn get(api_url: &str) -> i32 {
    api_request(api_url, reqwest::Method::GET, "/api/config", None, &[]).await
}

pub async fn set(api_url: &str, box_scale: Option<f64>, cycle_seconds: Option<f64>) -> i32 {
    let Some(body) = update_body(box_scale, cycle_seconds) else {
        return usage_error(
            "Nothing to update",
            Some("Pass --box-scale and/or --cycle-seconds"),
        );
    };
    api_request(api_url, reqwest::Method::POST, "/api/config", Some(body), &[]).await
}

/// Combined update body; `None` when no field was given.
pub fn update_body(box_scale: Option<f64>, cycle_seconds: Option<f64>) -> Option<serde_json::Value> {
    if box_scale.is_none() && cycle_seconds.is_none() {
        return None;
    }
    let mut body = json!({});
    if let Some(scale) = box_scale {
        body["box_scale"] = json!(scale);
    }
    if let Some(seconds) = cycle_seconds {
        body["cycle_seconds"] = json!(seconds);
    }
    Some(body)
}
