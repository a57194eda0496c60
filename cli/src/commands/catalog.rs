use crate::util::api_request;

/// Print the full catalog, or the single entry for `emotion`.
pub async fn run(api_url: &str, emotion: Option<&str>) -> i32 {
    match emotion {
        Some(label) => {
            api_request(
                api_url,
                reqwest::Method::GET,
                "/api/catalog/lookup",
                None,
                &[("emotion", label)],
            )
            .await
        }
        None => api_request(api_url, reqwest::Method::GET, "/api/catalog", None, &[]).await,
    }
}
