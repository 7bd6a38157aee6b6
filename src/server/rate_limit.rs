//! Per-client fixed-window rate limiting
//!
//! Each client address gets a counter that resets when its window expires.
//! The limiter is shared across request tasks behind a mutex; the critical
//! section is a single map lookup.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use log::warn;

use super::error::ApiError;
use super::AppState;

/// Map size at which expired windows are swept out.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Fixed-window request counter keyed by client address
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self { max_requests, window, windows: Mutex::new(HashMap::new()) }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request from `client` now.
    pub fn check(&self, client: IpAddr) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    /// Count a request from `client` at `now`.
    pub fn check_at(&self, client: IpAddr, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= PRUNE_THRESHOLD {
            let window = self.window;
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = windows.entry(client).or_insert(Window { started: now, count: 0 });
        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        if entry.count >= self.max_requests {
            return RateDecision::Limited {
                retry_after: self.window.saturating_sub(now.duration_since(entry.started)),
            };
        }

        entry.count += 1;
        RateDecision::Allowed { remaining: self.max_requests - entry.count }
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Client address from the connection, or loopback when unavailable.
pub fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// Middleware rejecting clients over their budget with 429.
pub async fn limit_by_client(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let client = client_ip(&request);
    match state.limiter.check(client) {
        RateDecision::Allowed { .. } => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            warn!("rate limit exceeded for {} on {}", client, request.uri().path());
            ApiError::RateLimited { limit: state.config.rate_limit_description(), retry_after }
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        let now = Instant::now();

        assert_eq!(limiter.check_at(ip(1), now), RateDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.check_at(ip(1), now), RateDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at(ip(1), now), RateDecision::Allowed { remaining: 0 });
        assert!(!limiter.check_at(ip(1), now).is_allowed());
    }

    #[test]
    fn test_retry_after_counts_down() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();
        limiter.check_at(ip(1), start);

        let decision = limiter.check_at(ip(1), start + Duration::from_secs(45));
        assert_eq!(decision, RateDecision::Limited { retry_after: Duration::from_secs(15) });
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at(ip(1), start).is_allowed());
        assert!(!limiter.check_at(ip(1), start + Duration::from_secs(59)).is_allowed());
        assert!(limiter.check_at(ip(1), start + Duration::from_secs(60)).is_allowed());
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        let now = Instant::now();

        assert!(limiter.check_at(ip(1), now).is_allowed());
        assert!(!limiter.check_at(ip(1), now).is_allowed());
        assert!(limiter.check_at(ip(2), now).is_allowed());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_expired_windows_are_pruned() {
        let limiter = RateLimiter::new(5, Duration::from_secs(1));
        let start = Instant::now();
        for i in 0..PRUNE_THRESHOLD {
            let addr = IpAddr::V6(std::net::Ipv6Addr::from(i as u128));
            limiter.check_at(addr, start);
        }
        assert_eq!(limiter.tracked_clients(), PRUNE_THRESHOLD);

        limiter.check_at(ip(1), start + Duration::from_secs(2));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_client_ip_from_connect_info() {
        let addr: SocketAddr = "192.168.1.7:4567".parse().unwrap();
        let mut request = Request::new(axum::body::Body::empty());
        assert_eq!(client_ip(&request), IpAddr::V4(Ipv4Addr::LOCALHOST));

        request.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_ip(&request), addr.ip());
    }
}
