use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::error::AppError;

/// Sliding-window request limiter keyed by caller IP.
///
/// Every check sweeps the whole map: expired timestamps are pruned and
/// keys whose queues empty out are dropped, so memory stays proportional
/// to callers active within the current window.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    max_requests: u32,
    window: Duration,
    trust_forwarded_for: bool,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
            trust_forwarded_for: false,
        }
    }

    /// Honors `x-forwarded-for` as the caller identity. Only safe behind a
    /// proxy that overwrites the header; off by default.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Records one request for the key; false means the caller is over
    /// the limit and the request must be rejected.
    pub async fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        windows.retain(|_, timestamps| {
            while timestamps
                .front()
                .is_some_and(|&t| now.duration_since(t) > self.window)
            {
                timestamps.pop_front();
            }
            !timestamps.is_empty()
        });

        let timestamps = windows.entry(key.to_string()).or_default();
        if timestamps.len() < self.max_requests as usize {
            timestamps.push_back(now);
            true
        } else {
            false
        }
    }
}

/// Per-IP rate-limiting middleware; rejects with 429 over the limit.
pub async fn enforce_rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_ip(&request, limiter.trust_forwarded_for);
    if limiter.check(&key).await {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, "Rate limit exceeded");
        AppError::RateLimited.into_response()
    }
}

/// Best-effort caller identity: the socket address, then a shared bucket.
/// The forwarded header only counts when a trusted proxy sets it; a direct
/// caller could otherwise rotate header values to dodge the limit.
fn client_ip(request: &Request, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        if let Some(forwarded) = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return forwarded.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_the_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check("1.2.3.4").await);
        }
        assert!(!limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("1.1.1.1").await);
        assert!(limiter.check("2.2.2.2").await);
        assert!(!limiter.check("1.1.1.1").await);
    }

    #[tokio::test]
    async fn window_expiry_frees_capacity() {
        let limiter = RateLimiter::new(1, Duration::from_millis(30));
        assert!(limiter.check("1.2.3.4").await);
        assert!(!limiter.check("1.2.3.4").await);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(limiter.check("1.2.3.4").await);
    }

    #[tokio::test]
    async fn stale_caller_keys_are_released() {
        let limiter = RateLimiter::new(5, Duration::from_millis(20));
        for i in 0..50 {
            assert!(limiter.check(&format!("10.0.0.{i}")).await);
        }
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(limiter.check("10.1.0.1").await);
        assert_eq!(limiter.windows.lock().await.len(), 1);
    }

    fn request_with_forwarded_header(value: &str) -> Request {
        let mut request = Request::new(axum::body::Body::empty());
        request
            .headers_mut()
            .insert("x-forwarded-for", value.parse().unwrap());
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([9, 9, 9, 9], 4000))));
        request
    }

    #[test]
    fn forwarded_header_is_ignored_by_default() {
        let request = request_with_forwarded_header("1.2.3.4");
        assert_eq!(client_ip(&request, false), "9.9.9.9");
    }

    #[test]
    fn forwarded_header_is_used_when_trusted() {
        let request = request_with_forwarded_header("1.2.3.4, 5.6.7.8");
        assert_eq!(client_ip(&request, true), "1.2.3.4");
    }
}
