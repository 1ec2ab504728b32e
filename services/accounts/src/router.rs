use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use zakaion_core::health::{healthz, readyz};
use zakaion_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    client::{register_client, register_phone},
    role_users,
    user::{
        activate_email, activate_phone, add_device, change_password, get_me, login, reset_password,
        update_me, update_user,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Current user
        .route("/user", get(get_me))
        .route("/user/login", post(login))
        .route("/user/update", put(update_me))
        .route("/user/{id}/update", put(update_user))
        .route("/user/active/phone", put(activate_phone))
        .route("/user/active/email", put(activate_email))
        .route("/user/reset/password", post(reset_password))
        .route("/user/change/password", put(change_password))
        .route("/user/add/device", put(add_device))
        // Client self-registration
        .route("/client/register/phone", post(register_phone))
        .route("/client/register", post(register_client))
        // Role-scoped management
        .route("/{role}/list", get(role_users::list))
        .route("/{role}/add", post(role_users::add))
        .route(
            "/{role}/{id}",
            get(role_users::get).delete(role_users::delete),
        )
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
