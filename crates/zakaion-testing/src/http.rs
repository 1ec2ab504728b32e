//! Request builders and response readers for router tests.

use axum::body::{Body, to_bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Request, Response};
use serde::Serialize;
use serde_json::Value;

/// Build a request with an optional JSON body and extra headers.
pub fn json_request<T: Serialize>(
    method: Method,
    uri: &str,
    headers: HeaderMap,
    body: Option<&T>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in &headers {
        builder = builder.header(name, value);
    }
    let body = match body {
        Some(payload) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(payload).expect("serializable test body"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid test request")
}

/// Read a response body as JSON (`Value::Null` when empty).
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable response body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
