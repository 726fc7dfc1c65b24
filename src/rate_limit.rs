//! Per-IP fixed-window request limiting.

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Requests one IP may make per window.
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

struct Window {
    count: u32,
    started: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Arc<Mutex<HashMap<IpAddr, Window>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Counts a request from `ip`. `Err` carries the time until the window
    /// resets.
    fn check(&self, ip: IpAddr, now: Instant) -> Result<(), Duration> {
        let mut windows = self.windows.lock();
        if windows.len() > 10_000 {
            let window = self.config.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(ip).or_insert(Window {
            count: 0,
            started: now,
        });
        if now.duration_since(entry.started) >= self.config.window {
            entry.count = 0;
            entry.started = now;
        }
        entry.count = entry.count.saturating_add(1);

        if entry.count > self.config.max_requests {
            Err((entry.started + self.config.window).saturating_duration_since(now))
        } else {
            Ok(())
        }
    }
}

/// Rejects with 429 once the caller's IP has used up its window. Requests
/// without connection info share one bucket.
pub async fn rate_limit(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Response {
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match limiter.check(ip, Instant::now()) {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            warn!(%ip, retry_after_secs = retry_after.as_secs(), "rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_after.as_secs().max(1).to_string())],
                Json(json!({
                    "message": "Too many requests from this IP, please try again later."
                })),
            )
                .into_response()
        }
    }
}
