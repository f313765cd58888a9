use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gka_auth_types::cookie::{clear_cookies, set_access_token_cookie, set_refresh_token_cookie};
use gka_auth_types::identity::Identity;
use gka_auth_types::session::SessionKeys;
use gka_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::StoreServiceError;
use crate::handlers::{JsonBody, non_blank, ok};
use crate::state::AppState;
use crate::usecase::user::{
    GetUserUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};

/// Public profile. Never carries the password hash.
#[derive(Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserBody {
    pub user: UserView,
}

/// Sign a token pair for `user` and set both cookies.
fn start_session(
    keys: &SessionKeys,
    jar: CookieJar,
    user: &User,
) -> Result<CookieJar, StoreServiceError> {
    let session = keys
        .issue(user.id, user.role)
        .map_err(|e| StoreServiceError::Internal(anyhow::Error::new(e).context("issue session")))?;
    let jar = set_access_token_cookie(jar, session.access_token, &keys.cookies);
    Ok(set_refresh_token_cookie(jar, session.refresh_token, &keys.cookies))
}

// ── POST /user/register ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = RegisterUseCase {
        repo: state.user_repo(),
        bcrypt_cost: state.bcrypt_cost,
    };
    let user = usecase
        .execute(RegisterInput {
            name: body.name.unwrap_or_default(),
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
            phone: non_blank(body.phone),
        })
        .await?;
    let jar = start_session(&state.session_keys, jar, &user)?;
    Ok((StatusCode::CREATED, jar, ok(UserBody { user: user.into() })))
}

// ── POST /user/login ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = LoginUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(LoginInput {
            email: body.email.unwrap_or_default(),
            password: body.password.unwrap_or_default(),
        })
        .await?;
    let jar = start_session(&state.session_keys, jar, &user)?;
    Ok((jar, ok(UserBody { user: user.into() })))
}

// ── POST /user/logout ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_cookies(jar, &state.session_keys.cookies);
    (jar, ok(MessageBody { message: "logged out" }))
}

// ── GET /user/me ─────────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(ok(UserBody { user: user.into() }))
}

// ── PATCH /user/me ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateMeRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = UpdateProfileUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                name: body.name,
                phone: body.phone,
            },
        )
        .await?;
    Ok(ok(UserBody { user: user.into() }))
}
