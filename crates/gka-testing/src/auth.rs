//! Session cookie helpers for integration tests.
//!
//! Protected routes read the `token` / `refresh` cookies. `MockAuth` signs
//! real tokens with test secrets so requests pass through the same session
//! middleware as production traffic.

use std::sync::Arc;

use axum::http::HeaderValue;
use gka_auth_types::cookie::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_EXP, CookiePolicy, REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_EXP,
};
use gka_auth_types::session::SessionKeys;
use gka_auth_types::token::{JwtSecrets, issue_token};
use gka_domain::user::UserRole;
use uuid::Uuid;

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

/// Session keys signed with the test secrets and a development cookie policy.
pub fn test_session_keys() -> Arc<SessionKeys> {
    Arc::new(SessionKeys {
        secrets: JwtSecrets {
            access: TEST_ACCESS_SECRET.to_owned(),
            refresh: TEST_REFRESH_SECRET.to_owned(),
        },
        cookies: CookiePolicy::default(),
    })
}

/// Identity to sign into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl MockAuth {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn user(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::User)
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, UserRole::Admin)
    }

    /// `Cookie` header carrying a valid access token.
    pub fn access_cookie(&self) -> HeaderValue {
        let (token, _) =
            issue_token(self.user_id, self.role, TEST_ACCESS_SECRET, ACCESS_TOKEN_EXP).unwrap();
        cookie_header(&format!("{ACCESS_TOKEN_COOKIE}={token}"))
    }

    /// `Cookie` header carrying only a valid refresh token.
    pub fn refresh_cookie(&self) -> HeaderValue {
        let (token, _) =
            issue_token(self.user_id, self.role, TEST_REFRESH_SECRET, REFRESH_TOKEN_EXP).unwrap();
        cookie_header(&format!("{REFRESH_TOKEN_COOKIE}={token}"))
    }

    /// `Cookie` header with a garbage access token plus a valid refresh token.
    pub fn stale_access_cookie(&self) -> HeaderValue {
        let (token, _) =
            issue_token(self.user_id, self.role, TEST_REFRESH_SECRET, REFRESH_TOKEN_EXP).unwrap();
        cookie_header(&format!(
            "{ACCESS_TOKEN_COOKIE}=not-a-jwt; {REFRESH_TOKEN_COOKIE}={token}"
        ))
    }
}

fn cookie_header(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}
