use std::time::Duration;

use zakaion_accounts::domain::types::Channel;
use zakaion_accounts::error::AccountsError;
use zakaion_accounts::infra::registry::Registry;
use zakaion_accounts::usecase::verification::VerificationUseCase;
use zakaion_auth_types::token::{CHALLENGE_TOKEN_TTL, ChallengeClaims, now_secs};
use zakaion_domain::role::Role;

use crate::helpers::{
    MockCodeSender, MockUserDirectory, TEST_CODE, TEST_PHONE, codec, fixed_codes,
    placeholder_user, registered_user, verification,
};

// ── Phone challenge ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_send_code_and_bind_it_to_the_phone() {
    let sender = MockCodeSender::default();
    let uc = verification(MockUserDirectory::empty(), sender.clone());

    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    let claims = codec().parse_challenge(&token).unwrap();
    assert_eq!(claims.address, TEST_PHONE);
    assert_eq!(claims.code.as_deref(), Some(TEST_CODE));
    assert_eq!(
        sender.sent(),
        vec![(Channel::Phone, TEST_PHONE.to_owned(), TEST_CODE.to_owned())]
    );
}

#[tokio::test]
async fn should_reject_blank_phone() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let result = uc.request_phone_challenge("   ").await;
    assert!(matches!(result, Err(AccountsError::BadParams)));
}

#[tokio::test]
async fn should_return_token_even_when_delivery_fails() {
    let sender = MockCodeSender::failing();
    let uc = verification(MockUserDirectory::empty(), sender.clone());

    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    assert!(codec().parse_challenge(&token).is_ok());
    assert_eq!(sender.sent().len(), 1);
}

#[tokio::test]
async fn should_issue_registration_ticket_for_correct_code() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    let ticket = uc
        .redeem_for_registration(&token, TEST_CODE, Some(TEST_PHONE))
        .await
        .unwrap();

    assert_eq!(ticket.phone_number, TEST_PHONE);
    let claims = codec().parse_challenge(&ticket.ticket).unwrap();
    assert_eq!(claims.address, TEST_PHONE);
    assert!(claims.code.is_none(), "ticket must not carry a code");
}

#[tokio::test]
async fn should_reject_wrong_code() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    let result = uc.redeem_for_registration(&token, "9999", None).await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_reject_challenge_for_another_phone() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    let result = uc
        .redeem_for_registration(&token, TEST_CODE, Some("+15550000000"))
        .await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_reject_expired_challenge() {
    let claims = ChallengeClaims {
        channel: Channel::Phone,
        address: TEST_PHONE.to_owned(),
        code: Some(TEST_CODE.to_owned()),
    };
    let issued_at = now_secs() - CHALLENGE_TOKEN_TTL.as_secs() - 5;
    let token = codec()
        .encode_at(&claims, CHALLENGE_TOKEN_TTL, issued_at)
        .unwrap();

    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let result = uc.redeem_for_registration(&token, TEST_CODE, None).await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_reject_token_signed_with_other_key() {
    let claims = ChallengeClaims {
        channel: Channel::Phone,
        address: TEST_PHONE.to_owned(),
        code: Some(TEST_CODE.to_owned()),
    };
    let forged = zakaion_auth_types::token::TokenCodec::new("other-secret")
        .encode(&claims, Duration::from_secs(600))
        .unwrap();

    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let result = uc.redeem_for_registration(&forged, TEST_CODE, None).await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_report_already_taken_for_registered_phone() {
    let owner = registered_user(Role::Client, TEST_PHONE, "owner@example.com", "pw").await;
    let uc = verification(MockUserDirectory::new(vec![owner]), MockCodeSender::default());
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    let result = uc.redeem_for_registration(&token, TEST_CODE, None).await;
    assert!(matches!(result, Err(AccountsError::AlreadyTaken)));
}

#[tokio::test]
async fn should_ignore_placeholder_holding_the_phone() {
    let placeholder = placeholder_user(Role::Client, TEST_PHONE, "");
    let uc = verification(
        MockUserDirectory::new(vec![placeholder]),
        MockCodeSender::default(),
    );
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    assert!(uc.redeem_for_registration(&token, TEST_CODE, None).await.is_ok());
}

#[tokio::test]
async fn should_refuse_replay_once_consumed() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    uc.redeem_for_registration(&token, TEST_CODE, None)
        .await
        .unwrap();
    let replay = uc.redeem_for_registration(&token, TEST_CODE, None).await;
    assert!(matches!(replay, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_not_consume_token_on_wrong_code() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    assert!(uc.redeem_for_registration(&token, "0000", None).await.is_err());
    assert!(uc.redeem_for_registration(&token, TEST_CODE, None).await.is_ok());
}

#[tokio::test]
async fn should_keep_token_redeemable_when_single_use_is_off() {
    let uc = VerificationUseCase {
        users: MockUserDirectory::empty(),
        sender: MockCodeSender::default(),
        registry: Registry::Disabled,
        codec: codec(),
        codes: fixed_codes(),
    };
    let token = uc.request_phone_challenge(TEST_PHONE).await.unwrap();

    let first = uc.redeem_for_registration(&token, TEST_CODE, None).await;
    let second = uc.redeem_for_registration(&token, TEST_CODE, None).await;
    assert!(first.is_ok());
    assert!(second.is_ok());
}

#[tokio::test]
async fn should_not_register_with_email_challenge() {
    let placeholder = placeholder_user(Role::Client, "", "me@mail.io");
    let uc = verification(
        MockUserDirectory::new(vec![placeholder]),
        MockCodeSender::default(),
    );
    let token = uc.request_email_challenge("me@mail.io").await.unwrap();

    let result = uc
        .redeem_for_registration(&token, TEST_CODE, Some("me@mail.io"))
        .await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

// ── E-mail challenge ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_return_not_found_for_unknown_email() {
    let uc = verification(MockUserDirectory::empty(), MockCodeSender::default());
    let result = uc.request_email_challenge("nobody@example.com").await;
    assert!(matches!(result, Err(AccountsError::NotFound)));
}

#[tokio::test]
async fn should_send_email_challenge_to_known_user() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let sender = MockCodeSender::default();
    let uc = verification(MockUserDirectory::new(vec![user]), sender.clone());

    let token = uc.request_email_challenge("anna@example.com").await.unwrap();

    assert_eq!(
        codec().parse_challenge(&token).unwrap().address,
        "anna@example.com"
    );
    assert_eq!(sender.sent()[0].0, Channel::Email);
}

#[tokio::test]
async fn should_not_treat_phone_as_email() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let uc = verification(MockUserDirectory::new(vec![user]), MockCodeSender::default());

    let result = uc.request_email_challenge(TEST_PHONE).await;
    assert!(matches!(result, Err(AccountsError::NotFound)));
}

// ── Activation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_activate_phone_with_correct_code() {
    let user = registered_user(Role::Partner, TEST_PHONE, "p@example.com", "pw").await;
    let users = MockUserDirectory::new(vec![user.clone()]);
    let uc = verification(users.clone(), MockCodeSender::default());

    let token = uc.request_activation(&user, Channel::Phone).await.unwrap();
    let updated = uc
        .redeem_for_activation(&token, TEST_CODE, &user, Channel::Phone)
        .await
        .unwrap();

    assert!(updated.is_phone_active);
    assert!(!updated.is_email_active);
    assert!(users.get(user.id).unwrap().is_phone_active);
}

#[tokio::test]
async fn should_reject_activation_token_for_other_address() {
    let user = registered_user(Role::Client, TEST_PHONE, "me@example.com", "pw").await;
    let uc = verification(
        MockUserDirectory::new(vec![user.clone()]),
        MockCodeSender::default(),
    );

    let foreign = uc.request_phone_challenge("+15559999999").await.unwrap();
    let result = uc
        .redeem_for_activation(&foreign, TEST_CODE, &user, Channel::Phone)
        .await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_reject_activation_token_from_other_channel() {
    let user = registered_user(Role::Client, TEST_PHONE, "me@example.com", "pw").await;
    let uc = verification(
        MockUserDirectory::new(vec![user.clone()]),
        MockCodeSender::default(),
    );

    let email_token = uc.request_activation(&user, Channel::Email).await.unwrap();
    let result = uc
        .redeem_for_activation(&email_token, TEST_CODE, &user, Channel::Phone)
        .await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_allow_retry_after_activation_save_fails() {
    let user = registered_user(Role::Client, TEST_PHONE, "me@example.com", "pw").await;
    let users = MockUserDirectory::new(vec![user.clone()]);
    let uc = verification(users.clone(), MockCodeSender::default());
    let token = uc.request_activation(&user, Channel::Phone).await.unwrap();

    users.set_failing_saves(true);
    let failed = uc
        .redeem_for_activation(&token, TEST_CODE, &user, Channel::Phone)
        .await;
    assert!(matches!(failed, Err(AccountsError::Internal(_))));
    assert!(!users.get(user.id).unwrap().is_phone_active);

    users.set_failing_saves(false);
    let retried = uc
        .redeem_for_activation(&token, TEST_CODE, &user, Channel::Phone)
        .await
        .unwrap();
    assert!(retried.is_phone_active);
    assert!(users.get(user.id).unwrap().is_phone_active);
}

#[tokio::test]
async fn should_require_address_on_file_for_activation() {
    let user = registered_user(Role::Client, TEST_PHONE, "", "pw").await;
    let uc = verification(
        MockUserDirectory::new(vec![user.clone()]),
        MockCodeSender::default(),
    );

    let result = uc.request_activation(&user, Channel::Email).await;
    assert!(matches!(result, Err(AccountsError::BadParams)));
}

// ── Password reset ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_redeem_password_reset_for_matching_email() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let users = MockUserDirectory::new(vec![user.clone()]);
    let uc = verification(users.clone(), MockCodeSender::default());

    let token = uc.request_email_challenge("anna@example.com").await.unwrap();
    let updated = uc
        .redeem_for_password_reset(&token, TEST_CODE, "anna@example.com")
        .await
        .unwrap();

    assert_eq!(updated.id, user.id);
    assert!(users.get(user.id).unwrap().is_email_active);
}

#[tokio::test]
async fn should_reject_password_reset_token_for_other_email() {
    let anna = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let bob = registered_user(Role::Client, "+15550000002", "bob@example.com", "pw").await;
    let uc = verification(
        MockUserDirectory::new(vec![anna, bob]),
        MockCodeSender::default(),
    );

    let token = uc.request_email_challenge("bob@example.com").await.unwrap();
    let result = uc
        .redeem_for_password_reset(&token, TEST_CODE, "anna@example.com")
        .await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_allow_retry_after_password_reset_save_fails() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let users = MockUserDirectory::new(vec![user.clone()]);
    let uc = verification(users.clone(), MockCodeSender::default());
    let token = uc.request_email_challenge("anna@example.com").await.unwrap();

    users.set_failing_saves(true);
    let failed = uc
        .redeem_for_password_reset(&token, TEST_CODE, "anna@example.com")
        .await;
    assert!(matches!(failed, Err(AccountsError::Internal(_))));

    users.set_failing_saves(false);
    uc.redeem_for_password_reset(&token, TEST_CODE, "anna@example.com")
        .await
        .unwrap();
    assert!(users.get(user.id).unwrap().is_email_active);
}
