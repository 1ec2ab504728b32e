//! Mock auth helpers for integration tests.
//!
//! Authenticated routes expect `Authorization: Bearer <session jwt>`.
//! `MockAuth` signs such a token with the same key the router under test uses.

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderValue};
use uuid::Uuid;
use zakaion_auth_types::token::{SessionClaims, TokenCodec};

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    codec: TokenCodec,
}

impl MockAuth {
    pub fn new(user_id: Uuid, codec: &TokenCodec) -> Self {
        Self {
            user_id,
            codec: codec.clone(),
        }
    }

    /// Signed session token, `Bearer ` prefix included.
    pub fn bearer(&self) -> String {
        let claims = SessionClaims {
            id: self.user_id,
            first_name: None,
            last_name: None,
            middle_name: None,
        };
        self.codec
            .issue_session(&claims)
            .expect("failed to sign test session token")
    }

    /// Headers carrying the bearer token.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.bearer()).expect("bearer token is a valid header"),
        );
        map
    }
}
