use chrono::{Duration, Utc};

use gka_domain::user::UserRole;
use gka_store::error::StoreServiceError;
use gka_store::usecase::admin::{
    DemoteAdminInput, DemoteAdminUseCase, PromoteUserInput, PromoteUserUseCase,
    RemovableAdminsUseCase,
};

use crate::helpers::{MockUserRepo, TEST_PASSWORD, test_user, test_user_with};

/// Admin A joined before admin B.
fn two_admins() -> (gka_store::domain::types::User, gka_store::domain::types::User) {
    let a = test_user_with(UserRole::Admin, Utc::now() - Duration::days(30));
    let b = test_user_with(UserRole::Admin, Utc::now() - Duration::days(1));
    (a, b)
}

// ── RemovableAdminsUseCase ───────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_admins_granted_after_caller() {
    let (a, b) = two_admins();
    let plain = test_user();
    let repo = MockUserRepo::new(vec![a.clone(), b.clone(), plain]);
    let usecase = RemovableAdminsUseCase { repo };

    let for_a: Vec<_> = usecase
        .execute(a.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(for_a, vec![b.id]);

    let for_b = usecase.execute(b.id).await.unwrap();
    assert!(for_b.is_empty(), "senior admin must not be removable by junior");
}

// ── DemoteAdminUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_demote_junior_admin() {
    let (a, b) = two_admins();
    let repo = MockUserRepo::new(vec![a.clone(), b.clone()]);
    let users = repo.users_handle();

    let demoted = DemoteAdminUseCase { repo }
        .execute(DemoteAdminInput {
            caller_id: a.id,
            target_id: b.id,
            password: TEST_PASSWORD.into(),
        })
        .await
        .unwrap();

    assert_eq!(demoted.role, UserRole::User);
    let stored = users.lock().unwrap();
    assert_eq!(stored.iter().find(|u| u.id == b.id).unwrap().role, UserRole::User);
}

#[tokio::test]
async fn should_forbid_demoting_senior_admin() {
    let (a, b) = two_admins();
    let repo = MockUserRepo::new(vec![a.clone(), b.clone()]);
    let users = repo.users_handle();

    let result = DemoteAdminUseCase { repo }
        .execute(DemoteAdminInput {
            caller_id: b.id,
            target_id: a.id,
            password: TEST_PASSWORD.into(),
        })
        .await;

    assert!(matches!(result, Err(StoreServiceError::Forbidden)));
    let stored = users.lock().unwrap();
    assert_eq!(stored.iter().find(|u| u.id == a.id).unwrap().role, UserRole::Admin);
}

#[tokio::test]
async fn should_reject_demote_with_wrong_password() {
    let (a, b) = two_admins();
    let result = DemoteAdminUseCase {
        repo: MockUserRepo::new(vec![a.clone(), b.clone()]),
    }
    .execute(DemoteAdminInput {
        caller_id: a.id,
        target_id: b.id,
        password: "not-my-password".into(),
    })
    .await;

    assert!(matches!(result, Err(StoreServiceError::InvalidCredentials)));
}

// ── PromoteUserUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_promote_user_to_admin() {
    let (a, _) = two_admins();
    let target = test_user();
    let repo = MockUserRepo::new(vec![a.clone(), target.clone()]);
    let users = repo.users_handle();

    let promoted = PromoteUserUseCase { repo }
        .execute(PromoteUserInput {
            caller_id: a.id,
            target_id: target.id,
            password: TEST_PASSWORD.into(),
        })
        .await
        .unwrap();

    assert_eq!(promoted.role, UserRole::Admin);
    let stored = users.lock().unwrap();
    assert!(stored.iter().find(|u| u.id == target.id).unwrap().role.is_admin());
}

#[tokio::test]
async fn should_require_password_to_promote() {
    let (a, _) = two_admins();
    let target = test_user();
    let result = PromoteUserUseCase {
        repo: MockUserRepo::new(vec![a.clone(), target.clone()]),
    }
    .execute(PromoteUserInput {
        caller_id: a.id,
        target_id: target.id,
        password: String::new(),
    })
    .await;

    assert!(matches!(result, Err(StoreServiceError::MissingField("password"))));
}

#[tokio::test]
async fn should_return_not_found_for_unknown_promote_target() {
    let (a, _) = two_admins();
    let result = PromoteUserUseCase {
        repo: MockUserRepo::new(vec![a.clone()]),
    }
    .execute(PromoteUserInput {
        caller_id: a.id,
        target_id: uuid::Uuid::now_v7(),
        password: TEST_PASSWORD.into(),
    })
    .await;

    assert!(matches!(result, Err(StoreServiceError::UserNotFound)));
}
