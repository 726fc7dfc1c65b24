use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    memory::MemoryUserBackend,
    password::{hash_password_blocking, verify_password_blocking},
    pg::PgUserBackend,
    repo_types::{NewUser, StoredUser, User, UserChanges, UserPatch},
    validate::{normalize_email, validate_email, validate_name, validate_password},
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(&'static str),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistence seam for user records. Implementations receive input that is
/// already validated, normalized and hashed, and must enforce email
/// uniqueness themselves.
#[async_trait]
pub trait UserBackend: Send + Sync {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, StoreError>;
    /// Returns `None` when no user has this id.
    async fn patch(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError>;
}

/// Credential store: validation and hashing in front of a [`UserBackend`].
#[derive(Clone)]
pub struct UserStore {
    backend: Arc<dyn UserBackend>,
}

impl UserStore {
    pub fn new(backend: Arc<dyn UserBackend>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryUserBackend::default()))
    }

    pub fn postgres(db: PgPool) -> Self {
        Self::new(Arc::new(PgUserBackend::new(db)))
    }

    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User, StoreError> {
        let name = name.trim();
        let email = normalize_email(email);
        validate_name(name).map_err(StoreError::Validation)?;
        validate_email(&email).map_err(StoreError::Validation)?;
        validate_password(password).map_err(StoreError::Validation)?;

        let password_hash = hash_password_blocking(password.to_owned()).await?;
        let user = self
            .backend
            .insert(NewUser {
                name: name.to_owned(),
                email,
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, "user record created");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        Ok(self.backend.get_by_email(&email).await?.map(|s| s.user))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.backend.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, StoreError> {
        let mut patch = UserPatch {
            profile_picture: changes.profile_picture,
            last_login: changes.last_login,
            is_active: changes.is_active,
            ..UserPatch::default()
        };
        if let Some(name) = changes.name {
            let name = name.trim().to_owned();
            validate_name(&name).map_err(StoreError::Validation)?;
            patch.name = Some(name);
        }
        if let Some(password) = changes.password {
            validate_password(&password).map_err(StoreError::Validation)?;
            patch.password_hash = Some(hash_password_blocking(password).await?);
        }

        let user = self
            .backend
            .patch(id, patch)
            .await?
            .ok_or(StoreError::NotFound)?;
        debug!(user_id = %id, "user record updated");
        Ok(user)
    }

    /// Returns the user when `password` matches the stored hash. Unknown
    /// emails and mismatches both yield `None`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let Some(stored) = self.backend.get_by_email(&email).await? else {
            return Ok(None);
        };
        let ok = verify_password_blocking(password.to_owned(), stored.password_hash).await?;
        Ok(ok.then_some(stored.user))
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<User, StoreError> {
        self.update(
            id,
            UserChanges {
                last_login: Some(OffsetDateTime::now_utc()),
                ..UserChanges::default()
            },
        )
        .await
    }
}
