//! Retry policy for outbound remote calls
//!
//! Both adapters apply the same split: mutating endpoints (creation,
//! deletion) get more attempts with a longer fixed inter-attempt delay;
//! read-only listing/status calls get fewer attempts with a shorter one.
//! Only transport failures and 5xx responses are retried; a completed 4xx
//! response is classified immediately and never retried.

use std::time::Duration;

/// A fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Policy for creation and deletion endpoints
    pub const MUTATION: Self = Self {
        max_attempts: 3,
        delay: Duration::from_secs(2),
    };

    /// Policy for read-only listing and status endpoints
    pub const READ: Self = Self {
        max_attempts: 2,
        delay: Duration::from_millis(500),
    };

    /// Whether another attempt is allowed after `attempt` failures
    ///
    /// `attempt` is zero-based: `should_retry(0)` asks whether the first
    /// failure may be followed by a second attempt.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}
