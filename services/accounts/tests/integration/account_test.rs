use uuid::Uuid;

use zakaion_accounts::error::AccountsError;
use zakaion_accounts::usecase::account::{
    AddDeviceInput, AddDeviceUseCase, ChangePasswordInput, ChangePasswordUseCase,
    CurrentUserUseCase, LoginInput, LoginUseCase, UpdateUserInput, UpdateUserUseCase,
};
use zakaion_domain::role::Role;

use crate::helpers::{
    FAST_HASHER, MockDeviceRepo, MockUserDirectory, TEST_PHONE, codec, placeholder_user,
    registered_user,
};

fn login(users: MockUserDirectory) -> LoginUseCase<MockUserDirectory> {
    LoginUseCase {
        users,
        codec: codec(),
        hasher: FAST_HASHER,
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_login_with_email_and_password() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let out = login(MockUserDirectory::new(vec![user.clone()]))
        .execute(LoginInput {
            email: "anna@example.com".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();

    assert_eq!(codec().parse_session(&out.token).unwrap().id, user.id);
}

#[tokio::test]
async fn should_reject_wrong_password() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let result = login(MockUserDirectory::new(vec![user]))
        .execute(LoginInput {
            email: "anna@example.com".into(),
            password: "nope".into(),
        })
        .await;
    assert!(matches!(result, Err(AccountsError::WrongCredential)));
}

#[tokio::test]
async fn should_not_login_placeholder_or_by_phone() {
    let placeholder = placeholder_user(Role::Client, "+15550000002", "ghost@example.com");
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let uc = login(MockUserDirectory::new(vec![placeholder, user]));

    let ghost = uc
        .execute(LoginInput {
            email: "ghost@example.com".into(),
            password: String::new(),
        })
        .await;
    assert!(matches!(ghost, Err(AccountsError::WrongCredential)));

    let by_phone = uc
        .execute(LoginInput {
            email: TEST_PHONE.into(),
            password: "pw".into(),
        })
        .await;
    assert!(matches!(by_phone, Err(AccountsError::WrongCredential)));
}

// ── CurrentUser ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_session_of_deleted_user() {
    let uc = CurrentUserUseCase {
        users: MockUserDirectory::empty(),
    };
    let result = uc.execute(Uuid::now_v7()).await;
    assert!(matches!(result, Err(AccountsError::Unauthorized)));
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_own_names_and_keep_flags() {
    let mut user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    user.is_phone_active = true;
    let users = MockUserDirectory::new(vec![user.clone()]);

    let updated = UpdateUserUseCase {
        users: users.clone(),
    }
    .execute(
        &user,
        user.id,
        UpdateUserInput {
            first_name: Some("Anya".into()),
            phone_number: Some(TEST_PHONE.into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.first_name.as_deref(), Some("Anya"));
    assert!(updated.is_phone_active, "unchanged phone keeps its flag");
}

#[tokio::test]
async fn should_reset_activation_when_address_changes() {
    let mut user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    user.is_phone_active = true;
    user.is_email_active = true;
    let users = MockUserDirectory::new(vec![user.clone()]);

    let updated = UpdateUserUseCase {
        users: users.clone(),
    }
    .execute(
        &user,
        user.id,
        UpdateUserInput {
            email: Some("new@example.com".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.email, "new@example.com");
    assert!(!updated.is_email_active);
    assert!(updated.is_phone_active);
    assert_eq!(users.get(user.id).unwrap().email, "new@example.com");
}

#[tokio::test]
async fn should_reject_address_owned_by_someone_else() {
    let me = registered_user(Role::Client, TEST_PHONE, "me@example.com", "pw").await;
    let other = registered_user(Role::Client, "+15550000002", "other@example.com", "pw").await;
    let uc = UpdateUserUseCase {
        users: MockUserDirectory::new(vec![me.clone(), other]),
    };

    let result = uc
        .execute(
            &me,
            me.id,
            UpdateUserInput {
                phone_number: Some("+15550000002".into()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(AccountsError::AlreadyTaken)));
}

#[tokio::test]
async fn should_let_editor_update_others_but_not_client() {
    let editor = registered_user(Role::Editor, "+15550000010", "ed@example.com", "pw").await;
    let client = registered_user(Role::Client, TEST_PHONE, "c@example.com", "pw").await;
    let other = registered_user(Role::Client, "+15550000011", "o@example.com", "pw").await;
    let uc = UpdateUserUseCase {
        users: MockUserDirectory::new(vec![editor.clone(), client.clone(), other.clone()]),
    };

    let by_editor = uc
        .execute(
            &editor,
            other.id,
            UpdateUserInput {
                last_name: Some("Petrov".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(by_editor.last_name.as_deref(), Some("Petrov"));

    let by_client = uc
        .execute(&client, other.id, UpdateUserInput::default())
        .await;
    assert!(matches!(by_client, Err(AccountsError::Forbidden)));
}

// ── ChangePassword ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_change_password_after_checking_old_one() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "old").await;
    let users = MockUserDirectory::new(vec![user.clone()]);
    let uc = ChangePasswordUseCase {
        users: users.clone(),
        hasher: FAST_HASHER,
    };

    let wrong = uc
        .execute(
            &user,
            ChangePasswordInput {
                old_password: "guess".into(),
                new_password: "new".into(),
            },
        )
        .await;
    assert!(matches!(wrong, Err(AccountsError::WrongCredential)));

    uc.execute(
        &user,
        ChangePasswordInput {
            old_password: "old".into(),
            new_password: "new".into(),
        },
    )
    .await
    .unwrap();
    let stored = users.get(user.id).unwrap();
    assert!(FAST_HASHER.verify("new", &stored.password_hash).await.unwrap());
}

#[tokio::test]
async fn should_let_placeholder_set_first_password() {
    let user = placeholder_user(Role::Executor, TEST_PHONE, "x@example.com");
    let users = MockUserDirectory::new(vec![user.clone()]);
    ChangePasswordUseCase {
        users: users.clone(),
        hasher: FAST_HASHER,
    }
    .execute(
        &user,
        ChangePasswordInput {
            old_password: String::new(),
            new_password: "first".into(),
        },
    )
    .await
    .unwrap();

    assert!(!users.get(user.id).unwrap().is_placeholder());
}

// ── AddDevice ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_device_for_actor() {
    let user = registered_user(Role::Client, TEST_PHONE, "anna@example.com", "pw").await;
    let devices = MockDeviceRepo::default();
    let uc = AddDeviceUseCase {
        devices: devices.clone(),
    };

    uc.execute(
        &user,
        AddDeviceInput {
            name: "Pixel".into(),
            fcm_token: "fcm-123".into(),
        },
    )
    .await
    .unwrap();
    let blank = uc
        .execute(
            &user,
            AddDeviceInput {
                name: "Pixel".into(),
                fcm_token: " ".into(),
            },
        )
        .await;

    assert!(matches!(blank, Err(AccountsError::BadParams)));
    let stored = devices.devices.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].user_id, user.id);
    assert_eq!(stored[0].fcm_token, "fcm-123");
}
