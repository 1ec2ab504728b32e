use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use zakaion_auth_types::token::TokenCodec;

use crate::infra::db::{DbDeviceRepository, DbUserRepository};
use crate::infra::delivery::Delivery;
use crate::infra::password::PasswordHasher;
use crate::infra::registry::Registry;
use crate::usecase::verification::CodeGenerator;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub codec: TokenCodec,
    pub codes: CodeGenerator,
    pub delivery: Delivery,
    pub registry: Registry,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn device_repo(&self) -> DbDeviceRepository {
        DbDeviceRepository {
            db: self.db.clone(),
        }
    }
}

impl FromRef<AppState> for TokenCodec {
    fn from_ref(state: &AppState) -> Self {
        state.codec.clone()
    }
}
