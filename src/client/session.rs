use std::{sync::Arc, time::Duration};

use time::OffsetDateTime;
use tracing::{info, warn};

use super::{
    api::{AuthApi, ClientError},
    draft::{DraftAutosaver, DRAFT_QUIET_PERIOD},
    notify::{Notification, Toaster},
    profile::{validate_profile, Draft, FieldError, MarketRole, Profile},
    storage::{
        draft_key, KeyValueStore, CONSULTATIONS_KEY, LEGACY_PROFILE_KEY, PROFILE_DATA_KEY,
        PROFILE_IMAGE_KEY, TOKEN_KEY, USER_KEY,
    },
    view::DashboardView,
};
use crate::{
    auth::dto::{SigninRequest, SignupRequest, UpdateProfileRequest},
    users::{
        validate::{validate_email, validate_name, validate_password},
        User,
    },
};

const NETWORK_ERROR: &str = "Network error. Please try again.";
const GUARD_DELAY: Duration = Duration::from_millis(1500);
const LOGOUT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated { token: String, user: Option<User> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    SignIn,
    SignUp,
    Dashboard,
    Other(String),
}

impl Page {
    pub fn is_auth_form(&self) -> bool {
        matches!(self, Self::SignIn | Self::SignUp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect {
        to: Page,
        after: Duration,
        notice: Notification,
    },
}

/// What a completed action wants shown, and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub notice: Notification,
    pub redirect: Option<(Page, Duration)>,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Role profile filled in alongside the account, kept locally.
    pub profile: Option<Profile>,
}

/// Client-side session: the stored token, the cached user and profile, and
/// the page-level decisions that depend on them.
pub struct ClientSession<S, A> {
    store: Arc<S>,
    api: A,
    toaster: Toaster,
    drafts: Option<DraftAutosaver>,
}

impl<S, A> ClientSession<S, A>
where
    S: KeyValueStore + 'static,
    A: AuthApi,
{
    pub fn new(store: Arc<S>, api: A) -> Self {
        Self {
            store,
            api,
            toaster: Toaster::new(),
            drafts: None,
        }
    }

    pub fn toaster(&mut self) -> &mut Toaster {
        &mut self.toaster
    }

    pub fn state(&self) -> SessionState {
        match self.store.get(TOKEN_KEY).filter(|t| !t.is_empty()) {
            Some(token) => SessionState::Authenticated {
                token,
                user: self.store.get_json(USER_KEY),
            },
            None => SessionState::Anonymous,
        }
    }

    fn token(&self) -> Option<String> {
        match self.state() {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::Anonymous => None,
        }
    }

    /// Decides from the stored token alone. Use `revalidate` to confirm the
    /// token with the server.
    pub fn guard(&mut self, page: &Page) -> Guard {
        let authenticated = self.token().is_some();
        let guard = match (authenticated, page.is_auth_form()) {
            (false, false) => Guard::Redirect {
                to: Page::SignIn,
                after: GUARD_DELAY,
                notice: Notification::error("You need to be signed in to access this page."),
            },
            (true, true) => Guard::Redirect {
                to: Page::Dashboard,
                after: GUARD_DELAY,
                notice: Notification::success(
                    "You are already logged in. Redirecting to dashboard.",
                ),
            },
            _ => Guard::Allow,
        };
        if let Guard::Redirect { notice, .. } = &guard {
            self.toaster.show(notice.clone());
        }
        guard
    }

    pub async fn signup(&mut self, form: SignupForm) -> Result<Outcome, Notification> {
        let name = form.name.trim();
        let email = form.email.trim();
        let checks = validate_password(&form.password)
            .and_then(|_| validate_email(email))
            .and_then(|_| validate_name(name));
        if let Err(msg) = checks {
            return Err(self.fail(Notification::error(msg)));
        }

        let req = SignupRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(form.password),
        };
        let res = self.api.signup(&req).await.map_err(|e| self.reject(e))?;

        self.persist_auth(&res.token, &res.user);
        if let Some(mut profile) = form.profile {
            let now = OffsetDateTime::now_utc();
            profile.created_at.get_or_insert(now);
            profile.last_updated = Some(now);
            self.store_profile(&profile);
        }
        info!(user_id = %res.user.id, "signed up");

        Ok(self.succeed(
            Notification::success("Registration successful! Welcome to your dashboard."),
            Some((Page::Dashboard, GUARD_DELAY)),
        ))
    }

    pub async fn signin(&mut self, email: &str, password: &str) -> Result<Outcome, Notification> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(self.fail(Notification::error("Email and password are required")));
        }
        if let Err(msg) = validate_email(email) {
            return Err(self.fail(Notification::error(msg)));
        }

        let req = SigninRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let res = self.api.signin(&req).await.map_err(|e| self.reject(e))?;

        self.persist_auth(&res.token, &res.user);
        info!(user_id = %res.user.id, "signed in");

        Ok(self.succeed(
            Notification::success("Login successful! Redirecting to dashboard."),
            Some((Page::Dashboard, GUARD_DELAY)),
        ))
    }

    /// Confirms the stored token with the server. A rejected token ends the
    /// session; an unreachable server leaves it alone.
    pub async fn revalidate(&mut self) -> Guard {
        let Some(token) = self.token() else {
            return self.guard(&Page::Dashboard);
        };

        match self.api.verify_token(&token).await {
            Ok(_) => Guard::Allow,
            Err(e) if e.is_unauthorized() => {
                warn!(error = %e, "stored token rejected; clearing session");
                self.clear_session();
                let notice = Notification::error(e.to_string());
                self.toaster.show(notice.clone());
                Guard::Redirect {
                    to: Page::SignIn,
                    after: GUARD_DELAY,
                    notice,
                }
            }
            Err(e) => {
                warn!(error = %e, "could not confirm session token");
                Guard::Allow
            }
        }
    }

    /// Re-reads the account from the server and caches it.
    pub async fn refresh_user(&mut self) -> Result<User, Notification> {
        let token = self
            .token()
            .ok_or_else(|| Notification::error("You need to be signed in to access this page."))?;
        let user = self.api.profile(&token).await.map_err(|e| self.reject(e))?;
        self.store.set_json(USER_KEY, &user);
        Ok(user)
    }

    pub async fn logout(&mut self) -> Outcome {
        if let Some(token) = self.token() {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "server logout failed; clearing local session anyway");
            }
        }
        self.clear_session();
        info!("logged out");
        self.succeed(
            Notification::success("You have been logged out successfully."),
            Some((Page::SignIn, LOGOUT_DELAY)),
        )
    }

    fn clear_session(&mut self) {
        self.discard_pending_drafts();
        for key in [
            TOKEN_KEY,
            USER_KEY,
            PROFILE_DATA_KEY,
            LEGACY_PROFILE_KEY,
            PROFILE_IMAGE_KEY,
            CONSULTATIONS_KEY,
        ] {
            self.store.remove(key);
        }
        for role in MarketRole::ALL {
            self.store.remove(&draft_key(role));
        }
    }

    /// The saved role profile. A picture kept under its own key fills in
    /// for a profile saved without one.
    pub fn profile(&self) -> Option<Profile> {
        let mut profile: Profile = self
            .store
            .get_json(PROFILE_DATA_KEY)
            .or_else(|| self.store.get_json(LEGACY_PROFILE_KEY))?;
        if profile.profile_picture.is_none() {
            profile.profile_picture = self.store.get_json(PROFILE_IMAGE_KEY);
        }
        Some(profile)
    }

    /// Profile to put back into the role's form: the saved profile when it
    /// is for this role, overlaid with any unsubmitted draft.
    pub fn resume_profile(&mut self, role: MarketRole) -> Profile {
        let mut profile = self
            .profile()
            .filter(|p| p.user_type == role)
            .unwrap_or_else(|| Profile::new(role));
        if let Some(draft) = self.load_draft(role) {
            profile.apply_draft(&draft);
        }
        profile
    }

    fn store_profile(&mut self, profile: &Profile) {
        self.discard_pending_drafts();
        self.store.set_json(PROFILE_DATA_KEY, profile);
        if let Some(picture) = &profile.profile_picture {
            self.store.set_json(PROFILE_IMAGE_KEY, picture);
        }
        self.store.remove(&draft_key(profile.user_type));
    }

    /// Validates and stores the role profile. When signed in, a changed
    /// name is pushed to the account as well.
    pub async fn save_profile(&mut self, mut profile: Profile) -> Result<Outcome, Vec<FieldError>> {
        if let Err(errors) = validate_profile(&profile) {
            self.toaster
                .show(Notification::error("Please correct the errors in the form"));
            return Err(errors);
        }

        let now = OffsetDateTime::now_utc();
        let created_at = self.profile().and_then(|p| p.created_at).unwrap_or(now);
        profile.created_at.get_or_insert(created_at);
        profile.last_updated = Some(now);
        self.store_profile(&profile);

        let mut notice = Notification::success("Profile saved successfully!");
        if let SessionState::Authenticated {
            token,
            user: Some(user),
        } = self.state()
        {
            let name = profile.name().filter(|n| *n != user.name);
            if let Some(name) = name {
                let req = UpdateProfileRequest {
                    name: Some(name.to_string()),
                    profile_picture: None,
                };
                match self.api.update_profile(&token, &req).await {
                    Ok(updated) => self.store.set_json(USER_KEY, &updated),
                    Err(e) => {
                        warn!(error = %e, "profile saved locally but account update failed");
                        notice = Notification::warning(
                            "Profile saved locally, but your account could not be updated.",
                        );
                    }
                }
            }
        }

        Ok(self.succeed(notice, Some((Page::Dashboard, Duration::ZERO))))
    }

    pub fn dashboard(&self) -> Option<DashboardView> {
        let profile = self.profile()?;
        let user: Option<User> = self.store.get_json(USER_KEY);
        Some(DashboardView::build(user.as_ref(), &profile))
    }

    pub fn save_draft(&self, role: MarketRole, draft: &Draft) {
        if !draft.is_empty() {
            self.store.set_json(&draft_key(role), draft);
        }
    }

    pub fn load_draft(&mut self, role: MarketRole) -> Option<Draft> {
        let draft: Draft = self.store.get_json(&draft_key(role))?;
        self.toaster.show(Notification::info("Draft data loaded"));
        Some(draft)
    }

    pub fn clear_draft(&self, role: MarketRole) {
        self.store.remove(&draft_key(role));
    }

    /// Records the form's current text input as a draft once typing pauses.
    pub fn autosave(&mut self, profile: &Profile) {
        let store = &self.store;
        self.drafts
            .get_or_insert_with(|| DraftAutosaver::spawn(store.clone(), DRAFT_QUIET_PERIOD))
            .save(profile.user_type, Draft::from_profile(profile));
    }

    fn discard_pending_drafts(&mut self) {
        if let Some(drafts) = self.drafts.take() {
            drafts.cancel();
        }
    }

    fn persist_auth(&self, token: &str, user: &User) {
        self.store.set(TOKEN_KEY, token.to_string());
        self.store.set_json(USER_KEY, user);
    }

    fn succeed(&mut self, notice: Notification, redirect: Option<(Page, Duration)>) -> Outcome {
        self.toaster.show(notice.clone());
        Outcome { notice, redirect }
    }

    fn fail(&mut self, notice: Notification) -> Notification {
        self.toaster.show(notice.clone());
        notice
    }

    fn reject(&mut self, err: ClientError) -> Notification {
        let notice = match err {
            ClientError::Network(e) => {
                warn!(error = %e, "auth request failed to reach the server");
                Notification::error(NETWORK_ERROR)
            }
            ClientError::Rejected { message, .. } => Notification::error(message),
            ClientError::Decode(e) => {
                warn!(error = %e, "unreadable auth response");
                Notification::error("Unexpected response from server. Please try again.")
            }
        };
        self.fail(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::{
            dto::{AuthResponse, VerifyTokenResponse},
            AuthService,
        },
        client::{notify::Severity, profile::UploadRef, storage::MemoryStore},
        error::ApiError,
        state::AppState,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Runs the real auth service in-process instead of over HTTP.
    struct InProcessApi {
        state: AppState,
        offline: AtomicBool,
    }

    impl InProcessApi {
        fn new() -> Self {
            Self {
                state: AppState::fake(),
                offline: AtomicBool::new(false),
            }
        }

        fn service(&self) -> Result<AuthService, ClientError> {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ClientError::Network("connection refused".into()));
            }
            Ok(AuthService::new(self.state.store.clone(), self.state.keys.clone()))
        }

        async fn whoami(&self, token: &str) -> Result<User, ClientError> {
            let service = self.service()?;
            let claims = self.state.keys.verify(token).map_err(|_| ClientError::Rejected {
                status: 401,
                message: "Invalid token".into(),
            })?;
            service.get_profile(claims.sub).await.map_err(rejected)
        }
    }

    fn rejected(e: ApiError) -> ClientError {
        ClientError::Rejected {
            status: e.status().as_u16(),
            message: e.to_string(),
        }
    }

    #[async_trait]
    impl AuthApi for InProcessApi {
        async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ClientError> {
            let s = self
                .service()?
                .signup(
                    req.name.as_deref().unwrap_or_default(),
                    req.email.as_deref().unwrap_or_default(),
                    req.password.as_deref().unwrap_or_default(),
                )
                .await
                .map_err(rejected)?;
            Ok(AuthResponse {
                user: s.user,
                token: s.token,
            })
        }

        async fn signin(&self, req: &SigninRequest) -> Result<AuthResponse, ClientError> {
            let s = self
                .service()?
                .signin(
                    req.email.as_deref().unwrap_or_default(),
                    req.password.as_deref().unwrap_or_default(),
                )
                .await
                .map_err(rejected)?;
            Ok(AuthResponse {
                user: s.user,
                token: s.token,
            })
        }

        async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse, ClientError> {
            let user = self.whoami(token).await?;
            Ok(VerifyTokenResponse {
                message: "Token is valid".into(),
                user: (&user).into(),
            })
        }

        async fn profile(&self, token: &str) -> Result<User, ClientError> {
            self.whoami(token).await
        }

        async fn update_profile(
            &self,
            token: &str,
            req: &UpdateProfileRequest,
        ) -> Result<User, ClientError> {
            let user = self.whoami(token).await?;
            self.service()?
                .update_profile(
                    user.id,
                    crate::auth::ProfileUpdate {
                        name: req.name.clone(),
                        profile_picture: req.profile_picture.clone(),
                    },
                )
                .await
                .map_err(rejected)
        }

        async fn logout(&self, token: &str) -> Result<(), ClientError> {
            let user = self.whoami(token).await?;
            self.service()?
                .touch_last_login(user.id)
                .await
                .map_err(rejected)?;
            Ok(())
        }
    }

    fn session() -> (Arc<MemoryStore>, ClientSession<MemoryStore, InProcessApi>) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), ClientSession::new(store, InProcessApi::new()))
    }

    fn ada_form() -> SignupForm {
        SignupForm {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "secret1".into(),
            profile: Some(
                Profile::new(MarketRole::Investor)
                    .with("name", "Ada Lovelace")
                    .with("email", "ada@example.com")
                    .with("phone", "5551234567")
                    .with("budget", "25000")
                    .with("location", "London"),
            ),
        }
    }

    #[tokio::test]
    async fn anonymous_is_sent_to_sign_in() {
        let (_, mut s) = session();
        assert_eq!(s.state(), SessionState::Anonymous);
        assert_eq!(s.guard(&Page::SignIn), Guard::Allow);
        match s.guard(&Page::Dashboard) {
            Guard::Redirect { to, after, notice } => {
                assert_eq!(to, Page::SignIn);
                assert_eq!(after, Duration::from_millis(1500));
                assert_eq!(notice.severity, Severity::Error);
            }
            Guard::Allow => panic!("anonymous user reached a protected page"),
        }
    }

    #[tokio::test]
    async fn signup_persists_session_and_profile() {
        let (store, mut s) = session();
        let outcome = s.signup(ada_form()).await.unwrap();
        assert_eq!(outcome.redirect.map(|r| r.0), Some(Page::Dashboard));

        match s.state() {
            SessionState::Authenticated { token, user } => {
                assert!(!token.is_empty());
                assert_eq!(user.unwrap().email, "ada@example.com");
            }
            SessionState::Anonymous => panic!("signup did not store a token"),
        }
        assert!(store.get(PROFILE_DATA_KEY).is_some());
        assert!(matches!(s.guard(&Page::SignUp), Guard::Redirect { to: Page::Dashboard, .. }));

        let view = s.dashboard().unwrap();
        assert_eq!(view.welcome, "Welcome back, Ada Lovelace!");
        assert_eq!(view.explore_text, "Explore Ideas");
    }

    #[tokio::test]
    async fn short_password_never_reaches_the_server() {
        let (_, mut s) = session();
        s.api.offline.store(true, Ordering::SeqCst);
        let mut form = ada_form();
        form.password = "12345".into();
        let notice = s.signup(form).await.unwrap_err();
        assert_eq!(notice.message, "Password must be at least 6 characters long");
    }

    #[tokio::test]
    async fn server_rejection_and_network_failure_are_distinct() {
        let (_, mut s) = session();
        s.signup(ada_form()).await.unwrap();
        s.logout().await;

        let notice = s.signin("ada@example.com", "wrong-pass").await.unwrap_err();
        assert_eq!(notice.message, "Invalid credentials");

        s.api.offline.store(true, Ordering::SeqCst);
        let notice = s.signin("ada@example.com", "secret1").await.unwrap_err();
        assert_eq!(notice.message, "Network error. Please try again.");
        assert_eq!(s.toaster().visible().map(|n| n.severity), Some(Severity::Error));
    }

    #[tokio::test]
    async fn logout_clears_every_key() {
        let (store, mut s) = session();
        s.signup(ada_form()).await.unwrap();
        store.set(PROFILE_IMAGE_KEY, "data:image/png;base64,AAAA".into());
        store.set(CONSULTATIONS_KEY, "[]".into());
        store.set(LEGACY_PROFILE_KEY, "{}".into());
        s.save_draft(
            MarketRole::Hirer,
            &Draft([("name".to_string(), "x".to_string())].into_iter().collect()),
        );

        let outcome = s.logout().await;
        assert_eq!(outcome.redirect, Some((Page::SignIn, Duration::from_secs(1))));
        assert!(store.is_empty());
        assert_eq!(s.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn revalidate_drops_a_token_the_server_rejects() {
        let (store, mut s) = session();
        store.set(TOKEN_KEY, "forged.token.value".into());
        assert_eq!(s.guard(&Page::Dashboard), Guard::Allow);

        match s.revalidate().await {
            Guard::Redirect { to, notice, .. } => {
                assert_eq!(to, Page::SignIn);
                assert_eq!(notice.message, "Invalid token");
            }
            Guard::Allow => panic!("forged token survived revalidation"),
        }
        assert!(store.get(TOKEN_KEY).is_none());
    }

    #[tokio::test]
    async fn revalidate_keeps_session_when_offline() {
        let (_, mut s) = session();
        s.signup(ada_form()).await.unwrap();
        assert_eq!(s.revalidate().await, Guard::Allow);
        s.api.offline.store(true, Ordering::SeqCst);
        assert_eq!(s.revalidate().await, Guard::Allow);
        assert!(matches!(s.state(), SessionState::Authenticated { .. }));
    }

    #[tokio::test]
    async fn saving_profile_renames_account() {
        let (_, mut s) = session();
        s.signup(ada_form()).await.unwrap();

        let profile = s.profile().unwrap().with("name", "Ada L.");
        s.save_profile(profile).await.unwrap();

        let user = s.refresh_user().await.unwrap();
        assert_eq!(user.name, "Ada L.");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(s.dashboard().unwrap().display_name, "Ada L.");
    }

    #[tokio::test]
    async fn invalid_profile_is_not_stored() {
        let (store, mut s) = session();
        let profile = Profile::new(MarketRole::Hirer).with("name", "Grace");
        let errors = s.save_profile(profile).await.unwrap_err();
        assert!(errors.iter().any(|e| e.field == "projectDescription"));
        assert!(store.get(PROFILE_DATA_KEY).is_none());
    }

    #[tokio::test]
    async fn drafts_load_and_clear() {
        let (_, mut s) = session();
        assert_eq!(s.load_draft(MarketRole::Investor), None);
        let draft = Draft([("budget".to_string(), "100".to_string())].into_iter().collect());
        s.save_draft(MarketRole::Investor, &draft);
        assert_eq!(s.load_draft(MarketRole::Investor), Some(draft));
        assert_eq!(
            s.toaster().visible().map(|n| n.message.clone()).as_deref(),
            Some("Draft data loaded")
        );
        s.clear_draft(MarketRole::Investor);
        assert_eq!(s.load_draft(MarketRole::Investor), None);
    }

    fn investor() -> Profile {
        Profile::new(MarketRole::Investor)
            .with("name", "Ada Lovelace")
            .with("email", "ada@example.com")
            .with("phone", "5551234567")
            .with("budget", "25000")
            .with("location", "London")
    }

    fn upload(content_type: &str, size: u64) -> UploadRef {
        UploadRef {
            id: "up-1".into(),
            name: "file".into(),
            content_type: content_type.into(),
            size,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn autosaved_input_comes_back_when_form_reopens() {
        let (_, mut s) = session();
        s.autosave(&Profile::new(MarketRole::Investor).with("name", "Ad"));
        s.autosave(&Profile::new(MarketRole::Investor).with("name", "Ada").with("budget", "900"));
        tokio::time::sleep(Duration::from_secs(3)).await;

        let resumed = s.resume_profile(MarketRole::Investor);
        assert_eq!(resumed.text("name"), Some("Ada"));
        assert_eq!(resumed.text("budget"), Some("900"));
        assert_eq!(
            s.toaster().visible().map(|n| n.message.clone()).as_deref(),
            Some("Draft data loaded")
        );
        assert_eq!(s.resume_profile(MarketRole::Hirer), Profile::new(MarketRole::Hirer));
    }

    #[tokio::test(start_paused = true)]
    async fn logout_drops_pending_autosave() {
        let (store, mut s) = session();
        store.set(TOKEN_KEY, "stale".into());
        s.autosave(&Profile::new(MarketRole::Hirer).with("name", "Grace"));
        s.logout().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn non_image_picture_is_not_saved() {
        let (store, mut s) = session();
        let mut profile = investor();
        profile.profile_picture = Some(upload("application/pdf", 50 * 1024 * 1024));
        let errors = s.save_profile(profile).await.unwrap_err();
        assert_eq!(errors[0].field, "profilePicture");
        assert!(store.get(PROFILE_DATA_KEY).is_none());
        assert!(store.get(PROFILE_IMAGE_KEY).is_none());
    }

    #[tokio::test]
    async fn picture_is_kept_under_its_own_key() {
        let (store, mut s) = session();
        let mut profile = investor();
        profile.profile_picture = Some(upload("image/png", 2048));
        s.save_profile(profile).await.unwrap();
        assert!(store.get(PROFILE_IMAGE_KEY).is_some());

        store.set_json(PROFILE_DATA_KEY, &investor());
        assert_eq!(s.profile().unwrap().profile_picture, Some(upload("image/png", 2048)));
        assert_eq!(s.dashboard().unwrap().picture.as_deref(), Some("up-1"));
    }
}
