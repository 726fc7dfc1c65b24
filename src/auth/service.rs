use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::{
    error::ApiError,
    state::AppState,
    users::{
        validate::{is_valid_email, NAME_MIN_CHARS, PASSWORD_MIN_CHARS},
        User, UserChanges, UserStore,
    },
};

/// A freshly authenticated user and the token issued for it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub profile_picture: Option<String>,
}

/// Signup, signin and profile operations on top of the credential store
/// and the token issuer.
#[derive(Clone)]
pub struct AuthService {
    store: UserStore,
    keys: JwtKeys,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.keys.clone())
    }
}

impl AuthService {
    pub fn new(store: UserStore, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::validation("Name, email, and password are required"));
        }
        if name.trim().chars().count() < NAME_MIN_CHARS {
            return Err(ApiError::validation("Name must be at least 2 characters long"));
        }
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(ApiError::validation("Password must be at least 6 characters long"));
        }
        if !is_valid_email(email.trim()) {
            warn!(email = %email, "signup with invalid email");
            return Err(ApiError::validation("Please enter a valid email address"));
        }

        let user = self.store.create(name, email, password).await.map_err(|e| {
            warn!(error = %e, "signup rejected by store");
            ApiError::from(e)
        })?;
        let token = self.keys.issue(user.id).map_err(ApiError::internal)?;

        info!(user_id = %user.id, email = %user.email, role = user.role.as_str(), "user signed up");
        Ok(AuthSession { user, token })
    }

    /// Unknown email, wrong password and deactivated accounts all produce
    /// the same `InvalidCredentials` error.
    pub async fn signin(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::validation("Email and password are required"));
        }

        let Some(user) = self.store.authenticate(email, password).await? else {
            warn!(email = %email, "signin with invalid credentials");
            return Err(ApiError::InvalidCredentials);
        };
        if !user.is_active {
            warn!(user_id = %user.id, "signin on deactivated account");
            return Err(ApiError::InvalidCredentials);
        }

        let user = self.store.touch_last_login(user.id).await?;
        let token = self.keys.issue(user.id).map_err(ApiError::internal)?;

        info!(user_id = %user.id, "user signed in");
        Ok(AuthSession { user, token })
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<User, ApiError> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound("User not found"))
    }

    /// Applies only the fields that are present and non-empty.
    pub async fn update_profile(&self, user_id: Uuid, update: ProfileUpdate) -> Result<User, ApiError> {
        let changes = UserChanges {
            name: update.name.filter(|n| !n.trim().is_empty()),
            profile_picture: update.profile_picture.filter(|p| !p.is_empty()),
            ..UserChanges::default()
        };
        if changes.name.is_none() && changes.profile_picture.is_none() {
            return self.get_profile(user_id).await;
        }

        let user = self.store.update(user_id, changes).await?;
        info!(user_id = %user.id, "profile updated");
        Ok(user)
    }

    /// Records last activity; used by logout before the client drops its token.
    pub async fn touch_last_login(&self, user_id: Uuid) -> Result<(), ApiError> {
        self.store.touch_last_login(user_id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn service() -> AuthService {
        let cfg = AppConfig::for_tests();
        AuthService::new(UserStore::in_memory(), JwtKeys::from_config(&cfg.jwt))
    }

    fn keys() -> JwtKeys {
        JwtKeys::from_config(&AppConfig::for_tests().jwt)
    }

    #[tokio::test]
    async fn signup_returns_user_and_token() {
        let svc = service();
        let session = svc
            .signup("Ada Lovelace", "ada@example.com", "secret1")
            .await
            .unwrap();
        assert_eq!(session.user.name, "Ada Lovelace");
        let claims = keys().verify(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id);
    }

    #[tokio::test]
    async fn signup_validation_messages() {
        let svc = service();
        let cases = [
            ("", "ada@example.com", "secret1", "Name, email, and password are required"),
            ("A", "ada@example.com", "secret1", "Name must be at least 2 characters long"),
            ("Ada", "ada@example.com", "12345", "Password must be at least 6 characters long"),
            ("Ada", "ada-at-example", "secret1", "Please enter a valid email address"),
        ];
        for (name, email, password, expected) in cases {
            let err = svc.signup(name, email, password).await.unwrap_err();
            assert_eq!(err.to_string(), expected);
        }
    }

    #[tokio::test]
    async fn signup_twice_is_duplicate() {
        let svc = service();
        svc.signup("Ada", "ada@example.com", "secret1").await.unwrap();
        let err = svc
            .signup("Ada Again", "Ada@Example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DuplicateEmail));
    }

    #[tokio::test]
    async fn signin_updates_last_login() {
        let svc = service();
        svc.signup("Ada", "ada@example.com", "secret1").await.unwrap();
        let session = svc.signin("ada@example.com", "secret1").await.unwrap();
        assert!(session.user.last_login.is_some());
        assert_eq!(keys().verify(&session.token).unwrap().sub, session.user.id);
    }

    #[tokio::test]
    async fn signin_failures_are_indistinguishable() {
        let svc = service();
        svc.signup("Ada", "ada@example.com", "secret1").await.unwrap();
        let wrong_pw = svc.signin("ada@example.com", "wrong").await.unwrap_err();
        let unknown = svc.signin("bob@example.com", "secret1").await.unwrap_err();
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
        assert!(matches!(wrong_pw, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn signin_requires_both_fields() {
        let svc = service();
        let err = svc.signin("", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");
    }

    #[tokio::test]
    async fn deactivated_account_cannot_sign_in() {
        let store = UserStore::in_memory();
        let svc = AuthService::new(store.clone(), keys());
        let session = svc.signup("Ada", "ada@example.com", "secret1").await.unwrap();
        store
            .update(
                session.user.id,
                UserChanges {
                    is_active: Some(false),
                    ..UserChanges::default()
                },
            )
            .await
            .unwrap();
        let err = svc.signin("ada@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidCredentials));
    }

    #[tokio::test]
    async fn update_profile_is_partial_and_repeatable() {
        let svc = service();
        let session = svc.signup("Ada Lovelace", "ada@example.com", "secret1").await.unwrap();
        let update = ProfileUpdate {
            name: Some("Ada L.".into()),
            profile_picture: None,
        };
        let first = svc.update_profile(session.user.id, update.clone()).await.unwrap();
        let second = svc.update_profile(session.user.id, update).await.unwrap();
        assert_eq!(first.name, "Ada L.");
        assert_eq!(second.name, "Ada L.");
        assert_eq!(second.email, "ada@example.com");
        assert_eq!(second.profile_picture, None);
    }

    #[tokio::test]
    async fn empty_update_changes_nothing() {
        let svc = service();
        let session = svc.signup("Ada", "ada@example.com", "secret1").await.unwrap();
        let user = svc
            .update_profile(
                session.user.id,
                ProfileUpdate {
                    name: Some("".into()),
                    profile_picture: Some("".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(user, session.user);
    }

    #[tokio::test]
    async fn profile_of_unknown_user_is_not_found() {
        let svc = service();
        let err = svc.get_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
