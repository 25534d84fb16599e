use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound id we accept before minting our own
const MAX_INBOUND_LEN: usize = 128;

/// Request id carried in request extensions for handlers.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);

fn inbound_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.len() <= MAX_INBOUND_LEN)
        .map(|s| s.to_string())
}

/// Reuses a proxy-supplied `x-request-id` or mints a UUID v4, exposes it to
/// handlers and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = inbound_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::debug!(
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
        "handling request"
    );

    request.extensions_mut().insert(RequestId(id.clone()));

    let mut response = next.run(request).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    response
}
