//! Bearer-token identity extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::token::{SessionClaims, TokenCodec};

/// Authenticated caller, decoded from `Authorization: Bearer <jwt>`.
///
/// Returns 401 if the header is absent, not UTF-8, or the token does not
/// verify. Role checks happen later, once the caller's record is loaded.
#[derive(Debug, Clone)]
pub struct BearerIdentity {
    pub user_id: Uuid,
    pub claims: SessionClaims,
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    S: Send + Sync,
    TokenCodec: FromRef<S>,
{
    type Rejection = StatusCode;

    // Decode synchronously so the returned future borrows nothing from `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let codec = TokenCodec::from_ref(state);
        let claims = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|raw| codec.parse_session(raw).ok());

        async move {
            let claims = claims.ok_or(StatusCode::UNAUTHORIZED)?;
            tracing::debug!(user_id = %claims.id, "bearer identity resolved");
            Ok(Self {
                user_id: claims.id,
                claims,
            })
        }
    }
}
