use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    repo::{StoreError, UserBackend},
    repo_types::{NewUser, StoredUser, User, UserPatch, UserRow},
};

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_active, last_login, \
                            profile_picture, created_at, updated_at";

/// Postgres backend. Uniqueness comes from the `lower(email)` unique index.
#[derive(Clone)]
pub struct PgUserBackend {
    db: PgPool,
}

impl PgUserBackend {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserBackend for PgUserBackend {
    async fn insert(&self, new: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        let res = sqlx::query_as::<_, UserRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(&self.db)
            .await;

        match res {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find user by id")?;
        Ok(row.map(User::from))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<StoredUser>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .context("find user by email")?;
        Ok(row.map(StoredUser::from))
    }

    async fn patch(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, StoreError> {
        let sql = format!(
            r#"
            UPDATE users
               SET name            = COALESCE($2, name),
                   profile_picture = COALESCE($3, profile_picture),
                   password_hash   = COALESCE($4, password_hash),
                   last_login      = COALESCE($5, last_login),
                   is_active       = COALESCE($6, is_active),
                   updated_at      = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(patch.name)
            .bind(patch.profile_picture)
            .bind(patch.password_hash)
            .bind(patch.last_login)
            .bind(patch.is_active)
            .fetch_optional(&self.db)
            .await
            .context("update user")?;
        Ok(row.map(User::from))
    }
}
