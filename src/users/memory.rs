use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    repo::{StoreError, UserBackend},
    repo_types::{NewUser, Role, StoredUser, User, UserPatch},
};

/// In-process backend. The write lock makes the uniqueness check and the
/// insert a single step.
#[derive(Default)]
pub struct MemoryUserBackend {
    users: RwLock<HashMap<Uuid, StoredUser>>,
}

#[async_trait]
impl UserBackend for MemoryUserBackend {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|s| s.user.email.to_lowercase() == new.email.to_lowercase())
        {
            return Err(StoreError::DuplicateEmail);
        }

        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            role: Role::User,
            is_active: true,
            last_login: None,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new.password_hash,
            },
        );
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).map(|s| s.user.clone()))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, StoreError> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|s| s.user.email.to_lowercase() == email)
            .cloned())
    }

    async fn patch(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let mut users = self.users.write().await;
        let Some(stored) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            stored.user.name = name;
        }
        if let Some(picture) = patch.profile_picture {
            stored.user.profile_picture = Some(picture);
        }
        if let Some(hash) = patch.password_hash {
            stored.password_hash = hash;
        }
        if let Some(at) = patch.last_login {
            stored.user.last_login = Some(at);
        }
        if let Some(active) = patch.is_active {
            stored.user.is_active = active;
        }
        stored.user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(stored.user.clone()))
    }
}
