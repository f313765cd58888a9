use rand::RngExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::{OtpStore, OutboxRepository};
use crate::domain::types::{OTP_CREATED_EVENT, OTP_LEN, OTP_SEND_LIMIT, OutboxEvent, normalize_phone};
use crate::error::StoreServiceError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..OTP_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

fn parse_phone(raw: &str) -> Result<String, StoreServiceError> {
    if raw.trim().is_empty() {
        return Err(StoreServiceError::MissingField("phone"));
    }
    normalize_phone(raw)
        .ok_or_else(|| StoreServiceError::InvalidInput("phone must be a 10 digit mobile number".into()))
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendOtpUseCase<S: OtpStore, B: OutboxRepository> {
    pub otp: S,
    pub outbox: B,
}

impl<S: OtpStore, B: OutboxRepository> SendOtpUseCase<S, B> {
    /// Returns the normalized phone the code was sent to.
    pub async fn execute(&self, user_id: Uuid, phone: &str) -> Result<String, StoreServiceError> {
        let phone = parse_phone(phone)?;

        // 1. Rate limit per phone
        let sends = self.otp.record_send(&phone).await?;
        if sends > OTP_SEND_LIMIT {
            return Err(StoreServiceError::TooManyOtps);
        }

        // 2. Queue SMS delivery, then arm the code
        let code = generate_code();
        let id = Uuid::now_v7();
        let event = OutboxEvent {
            id,
            kind: OTP_CREATED_EVENT.to_owned(),
            payload: json!({ "phone": phone, "code": code }),
            idempotency_key: format!("{OTP_CREATED_EVENT}:{id}"),
        };
        self.outbox.enqueue(&event).await?;
        self.otp.put_code(user_id, &phone, &code).await?;

        tracing::info!(%user_id, "otp issued");
        Ok(phone)
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpUseCase<S: OtpStore> {
    pub otp: S,
}

impl<S: OtpStore> VerifyOtpUseCase<S> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        phone: &str,
        code: &str,
    ) -> Result<String, StoreServiceError> {
        let phone = parse_phone(phone)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(StoreServiceError::MissingField("code"));
        }
        // The stored code is consumed even on a mismatch.
        match self.otp.take_code(user_id, &phone).await? {
            Some(stored) if stored == code => {}
            _ => return Err(StoreServiceError::InvalidOtp),
        }
        self.otp.mark_verified(user_id, &phone).await?;
        Ok(phone)
    }
}
