//! Role-gated session middleware.
//!
//! One middleware serves every protected scope; the minimum role is a parameter.
//! Apply with
//! `.route_layer(axum::middleware::from_fn_with_state(SessionGuard::new(keys, UserRole::Admin), require_session))`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;

use gka_core::error::AppError;
use gka_domain::user::UserRole;

use crate::cookie::set_access_token_cookie;
use crate::identity::Identity;
use crate::session::{SessionKeys, SessionOutcome};

/// Middleware state: session keys plus the minimum role for the scope.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    pub keys: Arc<SessionKeys>,
    pub required: UserRole,
}

impl SessionGuard {
    pub fn new(keys: Arc<SessionKeys>, required: UserRole) -> Self {
        Self { keys, required }
    }
}

/// Resolve the session, enforce the role, insert [`Identity`] and, when the
/// access token was reissued from the refresh token, attach the new cookie.
pub async fn require_session(
    State(guard): State<SessionGuard>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let outcome = match guard.keys.resolve(&jar) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::debug!(error = %e, "session rejected");
            return AppError::Unauthorized.into_response();
        }
    };

    let info = outcome.info();
    if !info.role.satisfies(guard.required) {
        return AppError::Forbidden.into_response();
    }
    req.extensions_mut().insert(Identity {
        user_id: info.user_id,
        role: info.role,
    });

    let response = next.run(req).await;
    match outcome {
        SessionOutcome::Valid(_) => response,
        SessionOutcome::Refreshed { access_token, .. } => {
            let jar = set_access_token_cookie(CookieJar::new(), access_token, &guard.keys.cookies);
            (jar, response).into_response()
        }
    }
}
