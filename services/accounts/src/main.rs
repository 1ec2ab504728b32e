use sea_orm::Database;
use tracing::{info, warn};

use zakaion_accounts::config::AccountsConfig;
use zakaion_accounts::infra::delivery::{Delivery, LogCodeSender, WebhookCodeSender};
use zakaion_accounts::infra::password::PasswordHasher;
use zakaion_accounts::infra::registry::{RedisChallengeRegistry, Registry};
use zakaion_accounts::router::build_router;
use zakaion_accounts::state::AppState;
use zakaion_accounts::usecase::verification::CodeGenerator;
use zakaion_auth_types::token::TokenCodec;
use zakaion_core::config::Config;
use zakaion_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccountsConfig::from_env().expect("invalid accounts configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let codes = match config.verification_fixed_code.clone() {
        Some(code) => {
            warn!("verification codes are fixed; do not use in production");
            CodeGenerator::Fixed(code)
        }
        None => CodeGenerator::Random,
    };

    let delivery = match config.code_delivery_url.clone() {
        Some(url) => Delivery::Webhook(
            WebhookCodeSender::new(url).expect("failed to build code delivery client"),
        ),
        None => Delivery::Log(LogCodeSender),
    };

    let registry = if config.challenge_single_use {
        let url = config
            .redis_url
            .as_deref()
            .expect("CHALLENGE_SINGLE_USE requires REDIS_URL");
        let pool = deadpool_redis::Config::from_url(url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .expect("failed to create Redis pool");
        Registry::Redis(RedisChallengeRegistry { pool })
    } else {
        Registry::Disabled
    };

    let state = AppState {
        db,
        codec: TokenCodec::new(&config.jwt_secret),
        codes,
        delivery,
        registry,
        hasher: PasswordHasher {
            cost: config.bcrypt_cost,
        },
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.accounts_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("accounts service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
