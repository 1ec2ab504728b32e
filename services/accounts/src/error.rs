use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use zakaion_auth_types::token::TokenError;

/// Accounts service error variants.
///
/// `WrongCredential` covers every token or code failure (malformed, bad
/// signature, expired, code mismatch) without saying which.
#[derive(Debug, thiserror::Error)]
pub enum AccountsError {
    #[error("wrong credential")]
    WrongCredential,
    #[error("already taken")]
    AlreadyTaken,
    #[error("not found")]
    NotFound,
    #[error("bad params")]
    BadParams,
    #[error("forbidden")]
    Forbidden,
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccountsError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::WrongCredential => "WRONG_CREDENTIAL",
            Self::AlreadyTaken => "ALREADY_TAKEN",
            Self::NotFound => "NOT_FOUND",
            Self::BadParams => "BAD_PARAMS",
            Self::Forbidden => "FORBIDDEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<TokenError> for AccountsError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => Self::WrongCredential,
            TokenError::Signing(e) => Self::Internal(anyhow::Error::new(e).context("sign token")),
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::WrongCredential | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AlreadyTaken => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadParams => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Only 500s are logged here; 4xx show up in the TraceLayer span.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
