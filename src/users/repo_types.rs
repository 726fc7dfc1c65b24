use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account role. Only `user` is ever assigned by the API.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    fn from_db(raw: &str) -> Self {
        match raw {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Public view of an account. Every read path hands out this type, so it
/// carries no password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn default_active() -> bool {
    true
}

/// A user together with its argon2 hash. Never leaves the store module.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Row in the `users` table.
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<OffsetDateTime>,
    pub profile_picture: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<UserRow> for StoredUser {
    fn from(r: UserRow) -> Self {
        Self {
            user: User {
                id: r.id,
                name: r.name,
                email: r.email,
                role: Role::from_db(&r.role),
                is_active: r.is_active,
                last_login: r.last_login,
                profile_picture: r.profile_picture,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
            password_hash: r.password_hash,
        }
    }
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        StoredUser::from(r).user
    }
}

/// Validated, normalized and hashed input for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial update requested by callers of the store. `None` leaves a field
/// untouched; a present `password` is validated and re-hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub password: Option<String>,
    pub last_login: Option<OffsetDateTime>,
    pub is_active: Option<bool>,
}

/// Partial update as seen by a backend: already validated and hashed.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub profile_picture: Option<String>,
    pub password_hash: Option<String>,
    pub last_login: Option<OffsetDateTime>,
    pub is_active: Option<bool>,
}
