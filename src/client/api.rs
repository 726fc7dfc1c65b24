use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::{
    auth::dto::{
        AuthResponse, MessageResponse, ProfileUpdatedResponse, SigninRequest, SignupRequest,
        UpdateProfileRequest, UserEnvelope, VerifyTokenResponse,
    },
    users::User,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }
}

/// Calls the client makes against `/api/auth`.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ClientError>;
    async fn signin(&self, req: &SigninRequest) -> Result<AuthResponse, ClientError>;
    async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse, ClientError>;
    async fn profile(&self, token: &str) -> Result<User, ClientError>;
    async fn update_profile(
        &self,
        token: &str,
        req: &UpdateProfileRequest,
    ) -> Result<User, ClientError>;
    async fn logout(&self, token: &str) -> Result<(), ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpAuthApi {
    /// `base` is the server root, e.g. `http://localhost:5000/`.
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base)
    }

    pub fn with_client(http: reqwest::Client, base: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base)?.join("api/auth/")?;
        Ok(Self { http, base })
    }

    async fn call<B, T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self
            .base
            .join(path)
            .map_err(|e| ClientError::Network(e.to_string()))?;
        debug!(%method, %url, "auth api call");

        let mut req = self.http.request(method, url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let res = req
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = res.status();
        let bytes = res
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| fallback_message(status));
            warn!(status = status.as_u16(), %message, "auth api rejected request");
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn fallback_message(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ClientError> {
        self.call(Method::POST, "signup", None, Some(req)).await
    }

    async fn signin(&self, req: &SigninRequest) -> Result<AuthResponse, ClientError> {
        self.call(Method::POST, "signin", None, Some(req)).await
    }

    async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse, ClientError> {
        self.call::<(), _>(Method::POST, "verify-token", Some(token), None)
            .await
    }

    async fn profile(&self, token: &str) -> Result<User, ClientError> {
        let env: UserEnvelope = self
            .call::<(), _>(Method::GET, "profile", Some(token), None)
            .await?;
        Ok(env.user)
    }

    async fn update_profile(
        &self,
        token: &str,
        req: &UpdateProfileRequest,
    ) -> Result<User, ClientError> {
        let res: ProfileUpdatedResponse = self
            .call(Method::PUT, "profile", Some(token), Some(req))
            .await?;
        Ok(res.user)
    }

    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let _: MessageResponse = self
            .call::<(), _>(Method::POST, "logout", Some(token), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_points_at_auth_routes() {
        let api = HttpAuthApi::new("http://localhost:5000").unwrap();
        assert_eq!(api.base.as_str(), "http://localhost:5000/api/auth/");
        assert_eq!(
            api.base.join("verify-token").unwrap().as_str(),
            "http://localhost:5000/api/auth/verify-token"
        );
    }

    #[test]
    fn unauthorized_detection() {
        let err = ClientError::Rejected {
            status: 401,
            message: "Invalid token".into(),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Invalid token");
        assert!(!ClientError::Network("refused".into()).is_unauthorized());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let api = HttpAuthApi::new("http://127.0.0.1:9").unwrap();
        let err = api.verify_token("t").await.unwrap_err();
        assert!(matches!(err, ClientError::Network(_)));
    }
}
