use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use zakaion_auth_types::identity::BearerIdentity;
use zakaion_domain::pagination::{Page, PageRequest};
use zakaion_domain::role::Role;

use crate::domain::types::UserView;
use crate::error::AccountsError;
use crate::handlers::{DataResponse, current_user};
use crate::infra::db::DbUserRepository;
use crate::state::AppState;
use crate::usecase::role_users::{AddRoleUserInput, RoleUsersUseCase};

/// Resolve the `{role}` segment. Super admins are not managed over HTTP.
fn managed_role(segment: &str) -> Result<Role, AccountsError> {
    Role::from_path_segment(segment)
        .filter(|role| *role != Role::SuperAdmin)
        .ok_or(AccountsError::NotFound)
}

fn usecase(
    state: &AppState,
    role: Role,
) -> RoleUsersUseCase<DbUserRepository, DbUserRepository> {
    RoleUsersUseCase {
        role,
        repo: state.user_repo(),
        users: state.user_repo(),
        hasher: state.hasher,
    }
}

// ── GET /{role}/list ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListQuery {
    pub size: Option<u32>,
    pub page: Option<u32>,
    pub search: Option<String>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        let default = PageRequest::default();
        PageRequest {
            size: self.size.unwrap_or(default.size),
            page: self.page.unwrap_or(default.page),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Path(role): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<DataResponse<Page<UserView>>>, AccountsError> {
    let role = managed_role(&role)?;
    let actor = current_user(&state, &identity).await?;
    let page = usecase(&state, role)
        .list(&actor, query.page_request(), query.search.as_deref())
        .await?;
    Ok(DataResponse::ok(page.map(UserView::from)))
}

// ── GET /{role}/{id} ─────────────────────────────────────────────────────────

pub async fn get(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Path((role, id)): Path<(String, Uuid)>,
) -> Result<Json<DataResponse<UserView>>, AccountsError> {
    let role = managed_role(&role)?;
    let actor = current_user(&state, &identity).await?;
    let user = usecase(&state, role).get(&actor, id).await?;
    Ok(DataResponse::ok(user.into()))
}

// ── POST /{role}/add ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoleUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    pub password: Option<String>,
}

pub async fn add(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Path(role): Path<String>,
    Json(body): Json<AddRoleUserRequest>,
) -> Result<Json<DataResponse<UserView>>, AccountsError> {
    let role = managed_role(&role)?;
    let actor = current_user(&state, &identity).await?;
    let user = usecase(&state, role)
        .add(
            &actor,
            AddRoleUserInput {
                first_name: body.first_name,
                last_name: body.last_name,
                middle_name: body.middle_name,
                phone_number: body.phone_number,
                email: body.email,
                password: body.password,
            },
        )
        .await?;
    Ok(DataResponse::ok(user.into()))
}

// ── DELETE /{role}/{id} ──────────────────────────────────────────────────────

pub async fn delete(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Path((role, id)): Path<(String, Uuid)>,
) -> Result<Json<DataResponse<Option<()>>>, AccountsError> {
    let role = managed_role(&role)?;
    let actor = current_user(&state, &identity).await?;
    usecase(&state, role).delete(&actor, id).await?;
    Ok(DataResponse::ok(None))
}
