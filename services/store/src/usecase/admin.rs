use uuid::Uuid;

use gka_domain::pagination::PageRequest;
use gka_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::StoreServiceError;
use crate::usecase::user::check_password;

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(&self, page: PageRequest) -> Result<Vec<User>, StoreServiceError> {
        self.repo.list(page).await
    }
}

// ── PromoteUser ──────────────────────────────────────────────────────────────

pub struct PromoteUserInput {
    pub caller_id: Uuid,
    pub target_id: Uuid,
    /// Caller's own password, re-entered to confirm the grant.
    pub password: String,
}

pub struct PromoteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> PromoteUserUseCase<R> {
    pub async fn execute(&self, input: PromoteUserInput) -> Result<User, StoreServiceError> {
        if input.password.is_empty() {
            return Err(StoreServiceError::MissingField("password"));
        }
        let caller = self
            .repo
            .find_by_id(input.caller_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)?;
        check_password(&input.password, &caller.password_hash)?;

        let target = self
            .repo
            .find_by_id(input.target_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)?;
        if target.role.is_admin() {
            return Ok(target);
        }
        if !self.repo.set_role(target.id, UserRole::Admin).await? {
            return Err(StoreServiceError::UserNotFound);
        }
        tracing::info!(caller_id = %caller.id, target_id = %target.id, "user promoted to admin");
        Ok(User {
            role: UserRole::Admin,
            ..target
        })
    }
}

// ── RemovableAdmins ──────────────────────────────────────────────────────────

/// Admins the caller may demote: those granted after the caller joined.
pub struct RemovableAdminsUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> RemovableAdminsUseCase<R> {
    pub async fn execute(&self, caller_id: Uuid) -> Result<Vec<User>, StoreServiceError> {
        let caller = self
            .repo
            .find_by_id(caller_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)?;
        self.repo.list_admins_created_after(caller.created_at).await
    }
}

// ── DemoteAdmin ──────────────────────────────────────────────────────────────

pub struct DemoteAdminInput {
    pub caller_id: Uuid,
    pub target_id: Uuid,
    pub password: String,
}

pub struct DemoteAdminUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DemoteAdminUseCase<R> {
    pub async fn execute(&self, input: DemoteAdminInput) -> Result<User, StoreServiceError> {
        if input.password.is_empty() {
            return Err(StoreServiceError::MissingField("password"));
        }
        let caller = self
            .repo
            .find_by_id(input.caller_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)?;
        check_password(&input.password, &caller.password_hash)?;

        let removable = self.repo.list_admins_created_after(caller.created_at).await?;
        let Some(target) = removable.into_iter().find(|u| u.id == input.target_id) else {
            // Unknown ids and senior admins look the same to the caller.
            return Err(StoreServiceError::Forbidden);
        };
        if !self.repo.set_role(target.id, UserRole::User).await? {
            return Err(StoreServiceError::UserNotFound);
        }
        tracing::info!(caller_id = %caller.id, target_id = %target.id, "admin demoted");
        Ok(User {
            role: UserRole::User,
            ..target
        })
    }
}
