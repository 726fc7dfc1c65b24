use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{
            AuthResponse, MessageResponse, ProfileUpdatedResponse, SigninRequest, SignupRequest,
            TokenUser, UpdateProfileRequest, UserEnvelope, VerifyTokenResponse,
        },
        extractors::AuthUser,
        service::{AuthService, ProfileUpdate},
    },
    error::ApiError,
    state::AppState,
};

/// Routes mounted under `/api/auth`.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/verify-token", post(verify_token))
        .route("/logout", post(logout))
}

#[instrument(skip_all)]
pub async fn signup(
    State(auth): State<AuthService>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(payload) = payload?;
    let session = auth
        .signup(
            payload.name.as_deref().unwrap_or_default(),
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: session.user,
            token: session.token,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn signin(
    State(auth): State<AuthService>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(payload) = payload?;
    let session = auth
        .signin(
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(AuthResponse {
        user: session.user,
        token: session.token,
    }))
}

#[instrument(skip_all)]
pub async fn get_profile(
    State(auth): State<AuthService>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = auth.get_profile(user.id).await?;
    Ok(Json(UserEnvelope { user }))
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(auth): State<AuthService>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let Json(payload) = payload?;
    let user = auth
        .update_profile(
            user.id,
            ProfileUpdate {
                name: payload.name,
                profile_picture: payload.profile_picture,
            },
        )
        .await?;

    Ok(Json(ProfileUpdatedResponse {
        message: "Profile updated successfully".into(),
        user,
    }))
}

#[instrument(skip_all)]
pub async fn verify_token(AuthUser(user): AuthUser) -> Json<VerifyTokenResponse> {
    Json(VerifyTokenResponse {
        message: "Token is valid".into(),
        user: TokenUser::from(&user),
    })
}

#[instrument(skip_all)]
pub async fn logout(
    State(auth): State<AuthService>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, ApiError> {
    auth.touch_last_login(user.id).await?;
    info!(user_id = %user.id, "user logged out");
    Ok(Json(MessageResponse {
        message: "Logged out successfully".into(),
    }))
}
