use axum::http::StatusCode;

/// Handler for `GET /healthz` (liveness).
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz` (readiness). Services with dependencies to probe
/// mount their own handler instead.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
