use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;

use zakaion_auth_types::identity::BearerIdentity;

use crate::domain::types::{Channel, UserView};
use crate::error::AccountsError;
use crate::handlers::{DataResponse, TokenResponse, current_user, verification};
use crate::state::AppState;
use crate::usecase::account::{
    AddDeviceInput, AddDeviceUseCase, ChangePasswordInput, ChangePasswordUseCase, LoginInput,
    LoginUseCase, UpdateUserInput, UpdateUserUseCase,
};

// ── POST /user/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, AccountsError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        codec: state.codec.clone(),
        hasher: state.hasher,
    };
    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(DataResponse::ok(TokenResponse { token: out.token }))
}

// ── GET /user ────────────────────────────────────────────────────────────────

pub async fn get_me(
    State(state): State<AppState>,
    identity: BearerIdentity,
) -> Result<Json<DataResponse<UserView>>, AccountsError> {
    let user = current_user(&state, &identity).await?;
    Ok(DataResponse::ok(user.into()))
}

// ── PUT /user/update, PUT /user/{id}/update ──────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUserInput {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            first_name: body.first_name,
            last_name: body.last_name,
            middle_name: body.middle_name,
            phone_number: body.phone_number,
            email: body.email,
        }
    }
}

pub async fn update_me(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<DataResponse<UserView>>, AccountsError> {
    update(&state, &identity, identity.user_id, body).await
}

pub async fn update_user(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<DataResponse<UserView>>, AccountsError> {
    update(&state, &identity, id, body).await
}

async fn update(
    state: &AppState,
    identity: &BearerIdentity,
    target_id: Uuid,
    body: UpdateUserRequest,
) -> Result<Json<DataResponse<UserView>>, AccountsError> {
    let actor = current_user(state, identity).await?;
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(&actor, target_id, body.into()).await?;
    Ok(DataResponse::ok(user.into()))
}

// ── PUT /user/active/phone, PUT /user/active/email ───────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatePhoneRequest {
    pub token: Option<String>,
    pub sms_code: Option<String>,
}

#[derive(Deserialize)]
pub struct ActivateEmailRequest {
    pub token: Option<String>,
    pub code: Option<String>,
}

pub async fn activate_phone(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Json(body): Json<ActivatePhoneRequest>,
) -> Result<Json<DataResponse<Option<TokenResponse>>>, AccountsError> {
    activate(&state, &identity, Channel::Phone, body.token, body.sms_code).await
}

pub async fn activate_email(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Json(body): Json<ActivateEmailRequest>,
) -> Result<Json<DataResponse<Option<TokenResponse>>>, AccountsError> {
    activate(&state, &identity, Channel::Email, body.token, body.code).await
}

/// Without token and code: challenge the on-file address. With both: redeem.
async fn activate(
    state: &AppState,
    identity: &BearerIdentity,
    channel: Channel,
    token: Option<String>,
    code: Option<String>,
) -> Result<Json<DataResponse<Option<TokenResponse>>>, AccountsError> {
    let user = current_user(state, identity).await?;
    let usecase = verification(state);
    match (token, code) {
        (Some(token), Some(code)) => {
            usecase
                .redeem_for_activation(&token, &code, &user, channel)
                .await?;
            Ok(DataResponse::ok(None))
        }
        _ => {
            let token = usecase.request_activation(&user, channel).await?;
            Ok(DataResponse::ok(Some(TokenResponse { token })))
        }
    }
}

// ── POST /user/reset/password ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    pub token: Option<String>,
    pub code: Option<String>,
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<DataResponse<Option<TokenResponse>>>, AccountsError> {
    let usecase = verification(&state);
    match (body.token, body.code) {
        (Some(token), Some(code)) => {
            usecase
                .redeem_for_password_reset(&token, &code, &body.email)
                .await?;
            Ok(DataResponse::ok(None))
        }
        _ => {
            let token = usecase.request_email_challenge(&body.email).await?;
            Ok(DataResponse::ok(Some(TokenResponse { token })))
        }
    }
}

// ── PUT /user/change/password ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Json<DataResponse<Option<()>>>, AccountsError> {
    let actor = current_user(&state, &identity).await?;
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
        hasher: state.hasher,
    };
    usecase
        .execute(
            &actor,
            ChangePasswordInput {
                old_password: body.old_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(DataResponse::ok(None))
}

// ── PUT /user/add/device ─────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fcm_token: String,
}

pub async fn add_device(
    State(state): State<AppState>,
    identity: BearerIdentity,
    Json(body): Json<AddDeviceRequest>,
) -> Result<Json<DataResponse<Option<()>>>, AccountsError> {
    let actor = current_user(&state, &identity).await?;
    let usecase = AddDeviceUseCase {
        devices: state.device_repo(),
    };
    usecase
        .execute(
            &actor,
            AddDeviceInput {
                name: body.name,
                fcm_token: body.fcm_token,
            },
        )
        .await?;
    Ok(DataResponse::ok(None))
}
