//! Conversions between axum's HTTP types and the backend's request/response.

use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::Json;
use inmem_core::{HttpMethod, Request, Response};
use serde_json::json;
use std::str::FromStr;
use tracing::debug;

fn rejection(status: StatusCode, message: String) -> HttpResponse {
    debug!(status = status.as_u16(), %message, "Request rejected by adapter");
    (status, Json(json!({ "error": message }))).into_response()
}

/// Converts an incoming HTTP request, rejecting unsupported methods (405)
/// and bodies that are not JSON (400).
pub(crate) fn to_core_request(
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Request, HttpResponse> {
    let method = HttpMethod::from_str(method.as_str())
        .map_err(|e| rejection(StatusCode::METHOD_NOT_ALLOWED, e.to_string()))?;

    let url = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    let mut request = Request::new(method, url);

    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }

    if !body.iter().all(u8::is_ascii_whitespace) {
        let body = serde_json::from_slice(body).map_err(|e| {
            rejection(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}"))
        })?;
        request = request.with_body(body);
    }

    Ok(request)
}

pub(crate) fn to_http_response(response: Response) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http = match response.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    };
    for (name, value) in &response.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            http.headers_mut().insert(name, value);
        }
    }
    http
}
