use chrono::Utc;
use uuid::Uuid;

use gka_domain::user::UserRole;

use crate::domain::repository::UserRepository;
use crate::domain::types::{MIN_PASSWORD_LEN, User, normalize_email, normalize_phone};
use crate::error::StoreServiceError;

/// Check `password` against a stored bcrypt hash.
pub(crate) fn check_password(password: &str, hash: &str) -> Result<(), StoreServiceError> {
    let matches = bcrypt::verify(password, hash)
        .map_err(|e| StoreServiceError::Internal(anyhow::Error::new(e).context("bcrypt verify")))?;
    if matches {
        Ok(())
    } else {
        Err(StoreServiceError::InvalidCredentials)
    }
}

/// Trimmed non-empty value or [`StoreServiceError::MissingField`].
pub(crate) fn require(value: &str, field: &'static str) -> Result<String, StoreServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreServiceError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn parse_phone(raw: &str) -> Result<String, StoreServiceError> {
    normalize_phone(raw)
        .ok_or_else(|| StoreServiceError::InvalidInput("phone must be a 10 digit mobile number".into()))
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

pub struct RegisterUseCase<R: UserRepository> {
    pub repo: R,
    pub bcrypt_cost: u32,
}

impl<R: UserRepository> RegisterUseCase<R> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, StoreServiceError> {
        let name = require(&input.name, "name")?;
        let email = normalize_email(&require(&input.email, "email")?);
        if !email.contains('@') {
            return Err(StoreServiceError::InvalidInput("invalid email".into()));
        }
        if input.password.is_empty() {
            return Err(StoreServiceError::MissingField("password"));
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreServiceError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let phone = match input.phone.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(parse_phone(p)?),
            _ => None,
        };

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(StoreServiceError::EmailAlreadyRegistered);
        }

        let password_hash = bcrypt::hash(&input.password, self.bcrypt_cost)
            .map_err(|e| StoreServiceError::Internal(anyhow::Error::new(e).context("bcrypt hash")))?;
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name,
            email,
            password_hash,
            phone,
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> LoginUseCase<R> {
    pub async fn execute(&self, input: LoginInput) -> Result<User, StoreServiceError> {
        let email = normalize_email(&require(&input.email, "email")?);
        if input.password.is_empty() {
            return Err(StoreServiceError::MissingField("password"));
        }
        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(StoreServiceError::InvalidCredentials)?;
        check_password(&input.password, &user.password_hash)?;
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, StoreServiceError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub phone: Option<String>,
}

pub struct UpdateProfileUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateProfileUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<User, StoreServiceError> {
        if input.name.is_none() && input.phone.is_none() {
            return Err(StoreServiceError::MissingData);
        }
        let name = input.name.as_deref().map(|n| require(n, "name")).transpose()?;
        let phone = input.phone.as_deref().map(parse_phone).transpose()?;
        let updated = self
            .repo
            .update_profile(user_id, name.as_deref(), phone.as_deref())
            .await?;
        if !updated {
            return Err(StoreServiceError::UserNotFound);
        }
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(StoreServiceError::UserNotFound)
    }
}
