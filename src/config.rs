use std::{fmt, time::Duration};

use anyhow::Context;
use serde::Deserialize;

use crate::rate_limit::RateLimitConfig;

/// Deployment environment, controls error verbosity and CORS origins.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "test" => Self::Test,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// Postgres connection string. Without it the server keeps users in memory.
    pub database_url: Option<String>,
    pub frontend_url: Option<String>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
}

const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 7;
const MAX_TTL_MINUTES: i64 = 60 * 24 * 366;

fn parse_ttl_minutes(raw: &str) -> anyhow::Result<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|m| (1..=MAX_TTL_MINUTES).contains(m))
        .with_context(|| format!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}"))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let environment = std::env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => 5000,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "mindmarket".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "mindmarket-users".into()),
            ttl_minutes: match std::env::var("JWT_TTL_MINUTES") {
                Ok(v) => parse_ttl_minutes(&v)?,
                Err(_) => DEFAULT_TTL_MINUTES,
            },
        };
        let mut rate_limit = RateLimitConfig::default();
        if let Ok(v) = std::env::var("RATE_LIMIT_MAX") {
            rate_limit.max_requests = v
                .parse::<u32>()
                .context("RATE_LIMIT_MAX must be a request count")?;
        }
        if let Ok(v) = std::env::var("RATE_LIMIT_WINDOW_MINUTES") {
            let minutes = v
                .parse::<u64>()
                .ok()
                .filter(|m| (1..=24 * 60).contains(m))
                .context("RATE_LIMIT_WINDOW_MINUTES must be between 1 and 1440")?;
            rate_limit.window = Duration::from_secs(minutes * 60);
        }
        Ok(Self {
            environment,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            database_url: std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            frontend_url: std::env::var("FRONTEND_URL").ok().filter(|v| !v.is_empty()),
            jwt,
            rate_limit,
        })
    }

    /// Origins allowed by CORS: the configured frontend in production,
    /// the local dev servers otherwise.
    pub fn allowed_origins(&self) -> Vec<String> {
        if self.environment.is_production() {
            self.frontend_url.iter().cloned().collect()
        } else {
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ]
        }
    }

    pub fn for_tests() -> Self {
        Self {
            environment: Environment::Test,
            host: "127.0.0.1".into(),
            port: 0,
            database_url: None,
            frontend_url: None,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            rate_limit: RateLimitConfig::default(),
        }
    }
}
