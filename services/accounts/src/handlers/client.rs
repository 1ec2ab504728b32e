use axum::{Json, extract::State, http::HeaderMap};
use serde::Deserialize;

use crate::error::AccountsError;
use crate::handlers::{DataResponse, TokenResponse, verification};
use crate::state::AppState;
use crate::usecase::registration::{RegisterClientInput, RegisterClientUseCase};

/// Header carrying the registration ticket.
const TICKET_HEADER: &str = "token";

// ── POST /client/register/phone ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRegisterRequest {
    pub phone_number: String,
    pub token: Option<String>,
    pub sms_code: Option<String>,
}

/// Without `token`/`smsCode`: send a code and return a challenge token.
/// With both: redeem it and return a registration ticket.
pub async fn register_phone(
    State(state): State<AppState>,
    Json(body): Json<PhoneRegisterRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, AccountsError> {
    let usecase = verification(&state);
    let token = match (body.token, body.sms_code) {
        (Some(token), Some(code)) => {
            usecase
                .redeem_for_registration(&token, &code, Some(&body.phone_number))
                .await?
                .ticket
        }
        _ => usecase.request_phone_challenge(&body.phone_number).await?,
    };
    Ok(DataResponse::ok(TokenResponse { token }))
}

// ── POST /client/register ────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub async fn register_client(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RegisterClientRequest>,
) -> Result<Json<DataResponse<TokenResponse>>, AccountsError> {
    let ticket = headers
        .get(TICKET_HEADER)
        .ok_or(AccountsError::BadParams)?
        .to_str()
        .map_err(|_| AccountsError::WrongCredential)?;

    let usecase = RegisterClientUseCase {
        users: state.user_repo(),
        codec: state.codec.clone(),
        hasher: state.hasher,
    };
    let out = usecase
        .execute(RegisterClientInput {
            ticket: ticket.to_owned(),
            first_name: body.first_name,
            last_name: body.last_name,
            middle_name: body.middle_name,
            email: body.email,
            password: body.password,
        })
        .await?;
    Ok(DataResponse::ok(TokenResponse { token: out.token }))
}
