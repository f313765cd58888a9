//! Cookie builders for access and refresh tokens.
//!
//! Both cookies are `HttpOnly` on path `/`. In production they are
//! `SameSite=None; Secure` so the SPA on another origin can send them;
//! otherwise `SameSite=Lax` without `Secure` for plain-http local development.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "token";

/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh";

/// Access-token JWT lifetime and cookie Max-Age in seconds (1 hour).
pub const ACCESS_TOKEN_EXP: u64 = 3600;

/// Refresh-token JWT lifetime and cookie Max-Age in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604800;

/// Environment-dependent cookie attributes.
#[derive(Debug, Clone, Default)]
pub struct CookiePolicy {
    /// `true` in production: `SameSite=None; Secure`.
    pub production: bool,
    /// Optional `Domain` attribute. Host-only cookies when `None`.
    pub domain: Option<String>,
}

impl CookiePolicy {
    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        let mut builder = Cookie::build((name, value))
            .path("/")
            .max_age(max_age)
            .http_only(true);
        builder = if self.production {
            builder.secure(true).same_site(SameSite::None)
        } else {
            builder.same_site(SameSite::Lax)
        };
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }
}

/// Set the access-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use gka_auth_types::cookie::{set_access_token_cookie, CookiePolicy, ACCESS_TOKEN_COOKIE};
///
/// let policy = CookiePolicy { production: true, domain: None };
/// let jar = set_access_token_cookie(CookieJar::new(), "token_value".to_string(), &policy);
/// let cookie = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
/// assert_eq!(cookie.same_site(), Some(SameSite::None));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(jar: CookieJar, value: String, policy: &CookiePolicy) -> CookieJar {
    jar.add(policy.build(
        ACCESS_TOKEN_COOKIE,
        value,
        Duration::seconds(ACCESS_TOKEN_EXP as i64),
    ))
}

/// Set the refresh-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use gka_auth_types::cookie::{set_refresh_token_cookie, CookiePolicy, REFRESH_TOKEN_COOKIE};
///
/// let policy = CookiePolicy::default();
/// let jar = set_refresh_token_cookie(CookieJar::new(), "refresh_value".to_string(), &policy);
/// let cookie = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert_eq!(cookie.same_site(), Some(SameSite::Lax));
/// assert!(!cookie.secure().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, policy: &CookiePolicy) -> CookieJar {
    jar.add(policy.build(
        REFRESH_TOKEN_COOKIE,
        value,
        Duration::seconds(REFRESH_TOKEN_EXP as i64),
    ))
}

/// Clear both token cookies by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use gka_auth_types::cookie::{
///     clear_cookies, set_access_token_cookie, set_refresh_token_cookie, CookiePolicy,
///     ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE,
/// };
///
/// let policy = CookiePolicy::default();
/// let jar = set_access_token_cookie(CookieJar::new(), "a".to_string(), &policy);
/// let jar = set_refresh_token_cookie(jar, "r".to_string(), &policy);
/// let jar = clear_cookies(jar, &policy);
/// assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().max_age(), Some(time::Duration::ZERO));
/// assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_cookies(jar: CookieJar, policy: &CookiePolicy) -> CookieJar {
    let access = policy.build(ACCESS_TOKEN_COOKIE, String::new(), Duration::ZERO);
    let refresh = policy.build(REFRESH_TOKEN_COOKIE, String::new(), Duration::ZERO);
    jar.add(access).add(refresh)
}
