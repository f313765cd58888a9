use axum::{
    extract::{Path, RawQuery, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gka_auth_types::identity::Identity;
use gka_domain::pagination::PageRequest;

use crate::error::StoreServiceError;
use crate::handlers::{JsonBody, ok};
use crate::handlers::user::{UserBody, UserView};
use crate::state::AppState;
use crate::usecase::admin::{
    DemoteAdminInput, DemoteAdminUseCase, ListUsersUseCase, PromoteUserInput, PromoteUserUseCase,
    RemovableAdminsUseCase,
};

#[derive(Serialize)]
pub struct UsersBody {
    pub users: Vec<UserView>,
}

/// Body of the role-changing endpoints: the caller's own password.
#[derive(Deserialize)]
pub struct PasswordConfirmation {
    #[serde(default)]
    pub password: String,
}

// ── GET /admin/users ─────────────────────────────────────────────────────────

pub async fn list_users(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, StoreServiceError> {
    let page: PageRequest = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| StoreServiceError::InvalidInput(format!("invalid query: {e}")))?
        .unwrap_or_default();
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(page.clamped()).await?;
    Ok(ok(UsersBody {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /admin/users/{id}/promote ───────────────────────────────────────────

pub async fn promote_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
    JsonBody(body): JsonBody<PasswordConfirmation>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = PromoteUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(PromoteUserInput {
            caller_id: identity.user_id,
            target_id,
            password: body.password,
        })
        .await?;
    Ok(ok(UserBody { user: user.into() }))
}

// ── GET /admin/admins/removable ──────────────────────────────────────────────

pub async fn removable_admins(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = RemovableAdminsUseCase {
        repo: state.user_repo(),
    };
    let admins = usecase.execute(identity.user_id).await?;
    Ok(ok(UsersBody {
        users: admins.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /admin/admins/{id}/demote ───────────────────────────────────────────

pub async fn demote_admin(
    identity: Identity,
    State(state): State<AppState>,
    Path(target_id): Path<Uuid>,
    JsonBody(body): JsonBody<PasswordConfirmation>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = DemoteAdminUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(DemoteAdminInput {
            caller_id: identity.user_id,
            target_id,
            password: body.password,
        })
        .await?;
    Ok(ok(UserBody { user: user.into() }))
}
