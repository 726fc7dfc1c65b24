use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::User;

/// Request body for signup. Fields are optional so that a missing field
/// produces the API's own validation message instead of a decode error.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Request body for signin.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Request body for `PUT /api/auth/profile`. Unknown fields are ignored.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Returned by signup and signin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdatedResponse {
    pub message: String,
    pub user: User,
}

/// Identity subset echoed by `verify-token`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for TokenUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyTokenResponse {
    pub message: String,
    pub user: TokenUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
