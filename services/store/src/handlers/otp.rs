use axum::{extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use gka_auth_types::identity::Identity;

use crate::domain::types::{OTP_TTL_SECS, PHONE_VERIFIED_TTL_SECS};
use crate::error::StoreServiceError;
use crate::handlers::{JsonBody, ok};
use crate::state::AppState;
use crate::usecase::otp::{SendOtpUseCase, VerifyOtpUseCase};

#[derive(Serialize)]
pub struct OtpBody {
    pub phone: String,
    pub expires_in: u64,
}

// ── POST /otp/send ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone: String,
}

pub async fn send_otp(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SendOtpRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = SendOtpUseCase {
        otp: state.otp_store(),
        outbox: state.outbox_repo(),
    };
    let phone = usecase.execute(identity.user_id, &body.phone).await?;
    Ok(ok(OtpBody {
        phone,
        expires_in: OTP_TTL_SECS,
    }))
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub code: String,
}

pub async fn verify_otp(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<VerifyOtpRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = VerifyOtpUseCase {
        otp: state.otp_store(),
    };
    let phone = usecase
        .execute(identity.user_id, &body.phone, &body.code)
        .await?;
    Ok(ok(OtpBody {
        phone,
        expires_in: PHONE_VERIFIED_TTL_SECS,
    }))
}
