//! Rate limiting utilities for the GitHub REST API.
//!
//! Creation calls check the core quota first and sleep until the window
//! resets when it is nearly exhausted.

use octocrab::Octocrab;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Maximum time to wait for rate limit reset (1 hour).
const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Rate limit information for the core API.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns how long to wait before the next request, if at all.
    ///
    /// Waits are capped at [`MAX_WAIT_SECS`].
    #[must_use]
    pub fn wait_duration(&self, now: u64) -> Option<Duration> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }

        let wait_secs = self.reset - now;
        if wait_secs > MAX_WAIT_SECS {
            warn!(
                wait_secs,
                max_wait = MAX_WAIT_SECS,
                "Rate limit reset too far in future, capping wait time"
            );
        }

        Some(Duration::from_secs(wait_secs.min(MAX_WAIT_SECS)))
    }
}

/// Fetches the current core rate limit.
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: u32::try_from(core.remaining).unwrap_or(u32::MAX),
        reset: core.reset,
        limit: u32::try_from(core.limit).unwrap_or(u32::MAX),
    })
}

/// Sleeps if the quota is low, returning `true` if it waited.
pub async fn wait_if_needed(info: &RateLimitInfo) -> bool {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let Some(wait) = info.wait_duration(now) else {
        return false;
    };

    info!(
        remaining = info.remaining,
        wait_secs = wait.as_secs(),
        "Rate limit low, waiting for reset"
    );
    tokio::time::sleep(wait).await;
    true
}

/// Ensures sufficient quota before a core API call.
///
/// Hosts without a rate limit endpoint (some GitHub Enterprise setups
/// disable it) are treated as unlimited.
pub async fn ensure_core_rate_limit(octocrab: &Octocrab) {
    match check_core_rate_limit(octocrab).await {
        Ok(info) => {
            wait_if_needed(&info).await;
        }
        Err(e) => {
            debug!(error = %e, "Rate limit unavailable, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wait_with_plenty_remaining() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 2_000,
            limit: 5_000,
        };

        assert_eq!(info.wait_duration(1_000), None);
    }

    #[test]
    fn no_wait_once_reset_passed() {
        let info = RateLimitInfo {
            remaining: 1,
            reset: 500,
            limit: 5_000,
        };

        assert_eq!(info.wait_duration(1_000), None);
    }

    #[test]
    fn waits_until_reset_when_low() {
        let info = RateLimitInfo {
            remaining: 2,
            reset: 1_030,
            limit: 5_000,
        };

        assert_eq!(info.wait_duration(1_000), Some(Duration::from_secs(30)));
    }

    #[test]
    fn caps_wait_time() {
        let info = RateLimitInfo {
            remaining: 0,
            reset: 1_000 + MAX_WAIT_SECS * 2,
            limit: 5_000,
        };

        assert_eq!(
            info.wait_duration(1_000),
            Some(Duration::from_secs(MAX_WAIT_SECS))
        );
    }

    #[tokio::test]
    async fn wait_if_needed_returns_immediately_with_quota() {
        let info = RateLimitInfo {
            remaining: 100,
            reset: 0,
            limit: 1000,
        };

        assert!(!wait_if_needed(&info).await);
    }

    #[tokio::test]
    async fn reads_core_quota_from_rate_limit_endpoint() {
        use serde_json::json;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let window = json!({ "limit": 5000, "used": 4998, "remaining": 2, "reset": 1_700_000_000u64 });
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {
                    "core": window,
                    "search": { "limit": 30, "used": 0, "remaining": 30, "reset": 1_700_000_000u64 },
                    "graphql": window
                },
                "rate": window
            })))
            .mount(&server)
            .await;
        let octocrab = Octocrab::builder()
            .base_uri(server.uri())
            .unwrap()
            .build()
            .unwrap();

        let info = check_core_rate_limit(&octocrab).await.unwrap();

        assert_eq!(info.remaining, 2);
        assert_eq!(info.limit, 5000);
        assert_eq!(info.reset, 1_700_000_000);
    }
}
