//! Access/refresh session resolution.
//!
//! The access cookie is tried first. If it is missing or fails validation the
//! refresh cookie is validated instead; on success a fresh access token is
//! minted and the refresh token's claims become the request identity.

use axum_extra::extract::CookieJar;

use crate::cookie::{
    ACCESS_TOKEN_COOKIE, ACCESS_TOKEN_EXP, CookiePolicy, REFRESH_TOKEN_COOKIE, REFRESH_TOKEN_EXP,
};
use crate::token::{AuthError, JwtSecrets, TokenInfo, issue_token, validate_token};

/// Everything needed to validate and mint session cookies.
#[derive(Debug, Clone)]
pub struct SessionKeys {
    pub secrets: JwtSecrets,
    pub cookies: CookiePolicy,
}

/// Freshly signed token pair for login/registration.
#[derive(Debug)]
pub struct IssuedSession {
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

#[derive(Debug)]
pub enum SessionOutcome {
    /// Access cookie was valid.
    Valid(TokenInfo),
    /// Access cookie failed but the refresh cookie was valid; `access_token`
    /// must be set on the response.
    Refreshed {
        info: TokenInfo,
        access_token: String,
    },
}

impl SessionOutcome {
    pub fn info(&self) -> &TokenInfo {
        match self {
            Self::Valid(info) | Self::Refreshed { info, .. } => info,
        }
    }
}

impl SessionKeys {
    /// Sign a new access + refresh pair for a user.
    pub fn issue(
        &self,
        user_id: uuid::Uuid,
        role: gka_domain::user::UserRole,
    ) -> Result<IssuedSession, AuthError> {
        let (access_token, access_token_exp) =
            issue_token(user_id, role, &self.secrets.access, ACCESS_TOKEN_EXP)?;
        let (refresh_token, _) =
            issue_token(user_id, role, &self.secrets.refresh, REFRESH_TOKEN_EXP)?;
        Ok(IssuedSession {
            access_token,
            access_token_exp,
            refresh_token,
        })
    }

    /// Resolve the caller's identity from the cookie jar.
    ///
    /// Returns the refresh-token error when both cookies fail, or
    /// [`AuthError::Malformed`] when neither cookie is present.
    pub fn resolve(&self, jar: &CookieJar) -> Result<SessionOutcome, AuthError> {
        if let Some(access) = jar.get(ACCESS_TOKEN_COOKIE) {
            match validate_token(access.value(), &self.secrets.access) {
                Ok(info) => return Ok(SessionOutcome::Valid(info)),
                Err(e) => tracing::debug!(error = %e, "access token rejected, trying refresh"),
            }
        }

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).ok_or(AuthError::Malformed)?;
        let info = validate_token(refresh.value(), &self.secrets.refresh)?;
        let (access_token, _) =
            issue_token(info.user_id, info.role, &self.secrets.access, ACCESS_TOKEN_EXP)?;
        Ok(SessionOutcome::Refreshed { info, access_token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_extra::extract::cookie::Cookie;
    use gka_domain::user::UserRole;
    use uuid::Uuid;

    fn keys() -> SessionKeys {
        SessionKeys {
            secrets: JwtSecrets {
                access: "access-secret".into(),
                refresh: "refresh-secret".into(),
            },
            cookies: CookiePolicy::default(),
        }
    }

    fn jar_with(access: Option<&str>, refresh: Option<&str>) -> CookieJar {
        let mut jar = CookieJar::new();
        if let Some(v) = access {
            jar = jar.add(Cookie::new(ACCESS_TOKEN_COOKIE, v.to_owned()));
        }
        if let Some(v) = refresh {
            jar = jar.add(Cookie::new(REFRESH_TOKEN_COOKIE, v.to_owned()));
        }
        jar
    }

    #[test]
    fn should_accept_valid_access_cookie_without_refresh() {
        let keys = keys();
        let user_id = Uuid::now_v7();
        let issued = keys.issue(user_id, UserRole::User).unwrap();

        let outcome = keys.resolve(&jar_with(Some(&issued.access_token), None)).unwrap();
        assert!(matches!(outcome, SessionOutcome::Valid(_)));
        assert_eq!(outcome.info().user_id, user_id);
    }

    #[test]
    fn should_reissue_access_token_from_valid_refresh_cookie() {
        let keys = keys();
        let user_id = Uuid::now_v7();
        let issued = keys.issue(user_id, UserRole::Admin).unwrap();

        let outcome = keys
            .resolve(&jar_with(Some("garbage"), Some(&issued.refresh_token)))
            .unwrap();
        let SessionOutcome::Refreshed { info, access_token } = outcome else {
            panic!("expected a refreshed session");
        };
        assert_eq!(info.user_id, user_id);
        assert_eq!(info.role, UserRole::Admin);

        let reissued = validate_token(&access_token, &keys.secrets.access).unwrap();
        assert_eq!(reissued.user_id, user_id);
    }

    #[test]
    fn should_not_accept_access_token_as_refresh_token() {
        let keys = keys();
        let issued = keys.issue(Uuid::now_v7(), UserRole::User).unwrap();

        let result = keys.resolve(&jar_with(None, Some(&issued.access_token)));
        assert!(matches!(result, Err(AuthError::InvalidSignature)));
    }

    #[test]
    fn should_fail_without_any_cookie() {
        let result = keys().resolve(&CookieJar::new());
        assert!(matches!(result, Err(AuthError::Malformed)));
    }
}
