//! JWT issuing and validation for access and refresh tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gka_domain::user::UserRole;

/// User identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub user_id: Uuid,
    pub role: UserRole,
    pub exp: u64,
}

/// Errors returned by [`validate_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("token issue failed")]
    Issue(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload shared by access and refresh tokens.
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | UUID string | user ID |
/// | `role` | custom | `u8` wire value | see [`UserRole`] |
/// | `exp` | `exp` | seconds since epoch | token expiration |
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub role: u8,
    pub exp: u64,
}

/// HMAC secrets for the two token kinds. Distinct secrets keep a leaked
/// access token from being replayed as a refresh token.
#[derive(Clone)]
pub struct JwtSecrets {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for JwtSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSecrets")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign a token for `user_id` valid for `ttl_secs`. Returns the token and its `exp`.
pub fn issue_token(
    user_id: Uuid,
    role: UserRole,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, u64), AuthError> {
    let exp = now_secs() + ttl_secs;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role: role.as_u8(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Issue)?;
    Ok((token, exp))
}

/// Decode and validate a JWT, returning the parsed identity.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenInfo, AuthError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        _ => AuthError::Malformed,
    })?;

    let claims = data.claims;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    let role = UserRole::from_u8(claims.role).ok_or(AuthError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        role,
        exp: claims.exp,
    })
}
