use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::warn;

use super::jwt::{JwtKeys, TokenError};
use crate::{
    error::{ApiError, AuthRejection},
    users::{User, UserStore},
};

/// Session gate: a handler taking `AuthUser` only runs for a request with a
/// valid bearer token whose user still exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Pulls the token out of `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthRejection::NoToken)?;

    let token = auth
        .strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or(AuthRejection::NoToken)?
        .trim();

    if token.is_empty() {
        return Err(AuthRejection::EmptyToken);
    }
    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    UserStore: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).map_err(ApiError::Unauthorized)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "rejected session token");
            match e {
                TokenError::Expired => ApiError::Unauthorized(AuthRejection::Expired),
                TokenError::Malformed => ApiError::Unauthorized(AuthRejection::InvalidToken),
            }
        })?;

        let store = UserStore::from_ref(state);
        match store.find_by_id(claims.sub).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => {
                warn!(user_id = %claims.sub, "token for unknown user");
                Err(ApiError::Unauthorized(AuthRejection::UserNotFound))
            }
            Err(e) => Err(ApiError::Internal {
                message: "Server error in authentication",
                cause: anyhow::Error::from(e)
                    .context(format!("session gate lookup for user {}", claims.sub)),
            }),
        }
    }
}
