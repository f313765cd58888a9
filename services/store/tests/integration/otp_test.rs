use uuid::Uuid;

use gka_store::domain::types::OTP_CREATED_EVENT;
use gka_store::error::StoreServiceError;
use gka_store::usecase::otp::{SendOtpUseCase, VerifyOtpUseCase};

use crate::helpers::{MockOtpStore, MockOutbox};

fn send_usecase() -> SendOtpUseCase<MockOtpStore, MockOutbox> {
    SendOtpUseCase {
        otp: MockOtpStore::default(),
        outbox: MockOutbox::default(),
    }
}

// ── SendOtpUseCase ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_queue_sms_and_store_code() {
    let user_id = Uuid::now_v7();
    let usecase = send_usecase();
    let events = usecase.outbox.events_handle();
    let state = usecase.otp.state_handle();

    let phone = usecase.execute(user_id, "+91 98765 43210").await.unwrap();

    assert_eq!(phone, "9876543210");
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, OTP_CREATED_EVENT);
    assert_eq!(events[0].payload["phone"], "9876543210");
    assert_eq!(
        events[0].idempotency_key,
        format!("{OTP_CREATED_EVENT}:{}", events[0].id)
    );
    let stored = state.lock().unwrap().codes[&(user_id, phone.clone())].clone();
    assert_eq!(events[0].payload["code"], stored.as_str());
}

#[tokio::test]
async fn should_rate_limit_sends_per_phone() {
    let user_id = Uuid::now_v7();
    let usecase = send_usecase();
    let events = usecase.outbox.events_handle();

    for _ in 0..5 {
        usecase.execute(user_id, "9876543210").await.unwrap();
    }
    let result = usecase.execute(user_id, "9876543210").await;

    assert!(matches!(result, Err(StoreServiceError::TooManyOtps)));
    assert_eq!(events.lock().unwrap().len(), 5);
    // Other numbers are unaffected.
    usecase.execute(user_id, "9123456789").await.unwrap();
}

#[tokio::test]
async fn should_reject_invalid_phone() {
    let result = send_usecase().execute(Uuid::now_v7(), "12345").await;
    assert!(matches!(result, Err(StoreServiceError::InvalidInput(_))));
}

// ── VerifyOtpUseCase ─────────────────────────────────────────────────────────

#[tokio::test]
async fn should_mark_phone_verified_on_matching_code() {
    let user_id = Uuid::now_v7();
    let send = send_usecase();
    let state = send.otp.state_handle();
    let phone = send.execute(user_id, "9876543210").await.unwrap();
    let code = state.lock().unwrap().codes[&(user_id, phone.clone())].clone();

    let verify = VerifyOtpUseCase { otp: send.otp };
    let verified = verify.execute(user_id, "98765-43210", &code).await.unwrap();

    assert_eq!(verified, phone);
    let state = state.lock().unwrap();
    assert!(state.verified.contains(&(user_id, phone)));
    assert!(state.codes.is_empty(), "code must be single use");
}

#[tokio::test]
async fn should_consume_code_on_mismatch() {
    let user_id = Uuid::now_v7();
    let send = send_usecase();
    let state = send.otp.state_handle();
    let phone = send.execute(user_id, "9876543210").await.unwrap();
    let code = state.lock().unwrap().codes[&(user_id, phone.clone())].clone();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let verify = VerifyOtpUseCase { otp: send.otp };
    let result = verify.execute(user_id, &phone, wrong).await;
    assert!(matches!(result, Err(StoreServiceError::InvalidOtp)));

    // The right code no longer works either.
    let retry = verify.execute(user_id, &phone, &code).await;
    assert!(matches!(retry, Err(StoreServiceError::InvalidOtp)));
    assert!(state.lock().unwrap().verified.is_empty());
}

#[tokio::test]
async fn should_not_share_codes_between_users() {
    let owner = Uuid::now_v7();
    let send = send_usecase();
    let state = send.otp.state_handle();
    let phone = send.execute(owner, "9876543210").await.unwrap();
    let code = state.lock().unwrap().codes[&(owner, phone.clone())].clone();

    let verify = VerifyOtpUseCase { otp: send.otp };
    let result = verify.execute(Uuid::now_v7(), &phone, &code).await;

    assert!(matches!(result, Err(StoreServiceError::InvalidOtp)));
}
