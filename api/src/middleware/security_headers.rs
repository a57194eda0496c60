use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

const BASELINE: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("x-frame-options", "DENY"),
    // Only frame-ancestors: a stricter CSP breaks the Swagger UI assets.
    ("content-security-policy", "frame-ancestors 'none'"),
];

/// Apply the security-header baseline to every response.
pub async fn apply(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    for (name, value) in BASELINE {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}
