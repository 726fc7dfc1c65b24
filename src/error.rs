use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::{state::AppState, users::StoreError};

/// Why the session gate turned a request away. All variants map to 401;
/// only the message differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    #[error("No token provided, authorization denied")]
    NoToken,
    #[error("No token, authorization denied")]
    EmptyToken,
    #[error("Token expired, please login again")]
    Expired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("User not found, authorization denied")]
    UserNotFound,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    /// Body could not be read or decoded; keeps axum's status (400, 413, 415...).
    #[error("{message}")]
    Body { status: StatusCode, message: String },
    #[error("User already exists with this email")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(AuthRejection),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{message}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(cause: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message: "Server error",
            cause: cause.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
            Self::Body { status, .. } => *status,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => Self::Validation(msg.to_string()),
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::NotFound => Self::NotFound("User not found"),
            StoreError::Backend(cause) => Self::internal(cause),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "rejected request body");
        Self::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Debug rendering of an internal error, attached to the response so the
/// outer layer can decide whether to expose it.
#[derive(Debug, Clone)]
pub struct ErrorStack {
    pub message: &'static str,
    pub stack: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Internal { message, cause } => {
                error!(error = ?cause, "internal error");
                let mut res = (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": message })),
                )
                    .into_response();
                res.extensions_mut().insert(ErrorStack {
                    message,
                    stack: format!("{cause:?}"),
                });
                res
            }
            other => {
                let status = other.status();
                (status, Json(json!({ "message": other.to_string() }))).into_response()
            }
        }
    }
}

/// Adds `stack` to 500 bodies outside production.
pub async fn expose_error_stack(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    let Some(ErrorStack { message, stack }) = res.extensions_mut().remove::<ErrorStack>() else {
        return res;
    };
    if state.config.environment.is_production() {
        return res;
    }
    (
        res.status(),
        Json(json!({
            "success": false,
            "message": message,
            "stack": stack,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(ApiError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Unauthorized(AuthRejection::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound("User not found").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::internal(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_convert() {
        assert!(matches!(
            ApiError::from(StoreError::Validation("Name is required")),
            ApiError::Validation(m) if m == "Name is required"
        ));
        assert!(matches!(ApiError::from(StoreError::DuplicateEmail), ApiError::DuplicateEmail));
        assert!(matches!(
            ApiError::from(StoreError::NotFound),
            ApiError::NotFound("User not found")
        ));
    }

    #[test]
    fn internal_response_hides_source_in_body() {
        let res = ApiError::internal(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let stack = res.extensions().get::<ErrorStack>().unwrap();
        assert_eq!(stack.message, "Server error");
        assert!(stack.stack.contains("connection refused"));
    }

    #[test]
    fn rejection_message_comes_from_variant() {
        assert_eq!(
            ApiError::Unauthorized(AuthRejection::Expired).to_string(),
            "Token expired, please login again"
        );
        assert_eq!(
            AuthRejection::NoToken.to_string(),
            "No token provided, authorization denied"
        );
    }

    #[test]
    fn rejection_messages_are_distinct() {
        let all = [
            AuthRejection::NoToken,
            AuthRejection::EmptyToken,
            AuthRejection::Expired,
            AuthRejection::InvalidToken,
            AuthRejection::UserNotFound,
        ];
        let mut msgs: Vec<String> = all.iter().map(|r| r.to_string()).collect();
        msgs.sort();
        msgs.dedup();
        assert_eq!(msgs.len(), all.len());
    }
}
