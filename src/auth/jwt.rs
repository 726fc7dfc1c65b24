use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Signing and verification keys for session tokens. Tokens are stateless:
/// rotating the secret invalidates every token issued so far.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64).saturating_mul(60)),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = TimeDuration::seconds(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX));
        let exp = now.checked_add(ttl).context("token expiry out of range")?;
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str, issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
        })
    }

    fn make_keys_with_ttl(ttl_minutes: i64) -> JwtKeys {
        JwtKeys::from_config(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: "iss".into(),
            audience: "aud".into(),
            ttl_minutes,
        })
    }

    fn sign_raw(secret: &str, claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issue_and_verify() {
        let keys = make_keys("dev-secret", "test-issuer", "test-aud");
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.exp - claims.iat, 5 * 60);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let token = sign_raw(
            "dev-secret",
            &Claims {
                sub: Uuid::new_v4(),
                iat: now - 7200,
                exp: now - 3600,
                iss: "iss".into(),
                aud: "aud".into(),
            },
        );
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn just_expired_token_gets_no_grace_period() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let token = sign_raw(
            "dev-secret",
            &Claims {
                sub: Uuid::new_v4(),
                iat: now - 60,
                exp: now - 5,
                iss: "iss".into(),
                aud: "aud".into(),
            },
        );
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn huge_ttl_does_not_overflow() {
        let keys = make_keys_with_ttl(i64::MAX);
        assert_eq!(keys.ttl, Duration::from_secs(u64::MAX));
        assert!(keys.issue(Uuid::new_v4()).is_err());
    }

    #[test]
    fn tampered_token_is_malformed() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let token = keys.issue(Uuid::new_v4()).unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = format!("{}x", parts[1]);
        assert_eq!(keys.verify(&parts.join(".")), Err(TokenError::Malformed));
    }

    #[test]
    fn other_secret_is_malformed() {
        let keys = make_keys("dev-secret", "iss", "aud");
        let foreign = make_keys("other-secret", "iss", "aud").issue(Uuid::new_v4()).unwrap();
        assert_eq!(keys.verify(&foreign), Err(TokenError::Malformed));
    }

    #[test]
    fn wrong_issuer_or_audience_is_malformed() {
        let good = make_keys("same-secret", "good-iss", "good-aud");
        let bad = make_keys("same-secret", "bad-iss", "bad-aud");
        let token = good.issue(Uuid::new_v4()).unwrap();
        assert_eq!(bad.verify(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn garbage_is_malformed() {
        let keys = make_keys("dev-secret", "iss", "aud");
        assert_eq!(keys.verify("not.a.jwt"), Err(TokenError::Malformed));
        assert_eq!(keys.verify(""), Err(TokenError::Malformed));
    }
}
