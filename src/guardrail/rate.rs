//! Per-caller sliding-window rate limiting.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::constants::{
    LLM_RATE_MAX_CALLS, LLM_RATE_WINDOW_SECS, REQUEST_RATE_MAX_CALLS, REQUEST_RATE_WINDOW_SECS,
};

/// Sliding-window request throttle, one timestamp list per caller.
///
/// Every call prunes stale timestamps and then records the attempt, even when
/// the attempt is rejected. The window therefore keeps growing for a caller
/// that hammers while blocked; memory stays bounded by the window length, but
/// a blocked caller never cools down faster than the window.
pub struct RateLimiter {
    window: Duration,
    max_calls: usize,
    windows: Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_calls: usize) -> Self {
        Self {
            window,
            max_calls,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// The request-level limiter (5 calls per 5 seconds).
    pub fn request_level() -> Self {
        Self::new(
            Duration::from_secs(REQUEST_RATE_WINDOW_SECS),
            REQUEST_RATE_MAX_CALLS,
        )
    }

    /// The LLM-call limiter (30 calls per 60 seconds).
    pub fn llm_level() -> Self {
        Self::new(Duration::from_secs(LLM_RATE_WINDOW_SECS), LLM_RATE_MAX_CALLS)
    }

    /// Records an attempt for `caller_id` and returns whether it is allowed.
    pub fn allow(&self, caller_id: &str) -> bool {
        self.allow_at(Instant::now(), caller_id)
    }

    /// Clock-injected variant of [`allow`](Self::allow) for deterministic tests.
    pub(crate) fn allow_at(&self, now: Instant, caller_id: &str) -> bool {
        let mut windows = self.windows.lock();
        let window = windows.entry(caller_id.to_string()).or_default();

        // Prune before evaluating the limit, never after.
        window.retain(|seen| now.duration_since(*seen) < self.window);
        window.push(now);

        let allowed = window.len() <= self.max_calls;
        if !allowed {
            debug!(
                caller = caller_id,
                in_window = window.len(),
                max = self.max_calls,
                "rate limit exceeded"
            );
        }
        allowed
    }

    /// Number of callers currently tracked.
    pub fn tracked_callers(&self) -> usize {
        self.windows.lock().len()
    }
}
