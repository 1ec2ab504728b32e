use axum::Json;
use serde::Serialize;

use zakaion_auth_types::identity::BearerIdentity;

use crate::domain::types::User;
use crate::error::AccountsError;
use crate::infra::db::DbUserRepository;
use crate::infra::delivery::Delivery;
use crate::infra::registry::Registry;
use crate::state::AppState;
use crate::usecase::account::CurrentUserUseCase;
use crate::usecase::verification::VerificationUseCase;

pub mod client;
pub mod role_users;
pub mod user;

/// `{"data": ...}` envelope around every successful response.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { data })
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Load the record behind the bearer token.
pub(crate) async fn current_user(
    state: &AppState,
    identity: &BearerIdentity,
) -> Result<User, AccountsError> {
    CurrentUserUseCase {
        users: state.user_repo(),
    }
    .execute(identity.user_id)
    .await
}

pub(crate) fn verification(
    state: &AppState,
) -> VerificationUseCase<DbUserRepository, Delivery, Registry> {
    VerificationUseCase {
        users: state.user_repo(),
        sender: state.delivery.clone(),
        registry: state.registry.clone(),
        codec: state.codec.clone(),
        codes: state.codes.clone(),
    }
}
