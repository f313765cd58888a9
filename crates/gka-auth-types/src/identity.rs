//! Authenticated identity extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use gka_core::error::AppError;
use gka_domain::user::UserRole;

/// Caller identity placed in request extensions by
/// [`require_session`](crate::middleware::require_session).
///
/// Returns 401 if the route is not behind the session middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async block to avoid E0195.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts.extensions.get::<Identity>().copied();
        async move { identity.ok_or(AppError::Unauthorized) }
    }
}
