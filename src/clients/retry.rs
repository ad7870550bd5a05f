//! Retry policy for transport failures and forced status codes.

use std::time::Duration;

/// Default number of retries after the original attempt.
pub const DEFAULT_RETRIES: u32 = 5;

/// Default exponential backoff factor, in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 0.3;

/// Status codes retried by default.
pub const DEFAULT_FORCE_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];

/// Upper bound for a single backoff sleep.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Which phase of an attempt failed without producing a response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportFailure {
    /// The connection could not be established.
    Connect,
    /// The request was sent but reading the response failed or timed out.
    Read,
    /// The request could not be built or followed; never retried.
    Other,
}

impl TransportFailure {
    /// Classifies a `reqwest` error.
    ///
    /// Connect timeouts count as [`TransportFailure::Connect`].
    #[must_use]
    pub fn classify(error: &reqwest::Error) -> Self {
        if error.is_connect() {
            Self::Connect
        } else if error.is_timeout() || error.is_body() || error.is_decode() || error.is_request() {
            Self::Read
        } else {
            Self::Other
        }
    }
}

/// Bounded retry policy with exponential backoff.
///
/// A call makes at most `retries + 1` attempts. Connection failures, read
/// failures and responses whose status is in `force_status_codes` are
/// retried; any other response, including every 4xx, is final.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use dm_api_client::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.retries, 5);
/// assert_eq!(policy.delay_for(1), Duration::from_millis(300));
/// assert_eq!(policy.delay_for(3), Duration::from_millis(1200));
/// assert!(policy.is_forced_status(503));
/// assert!(!policy.is_forced_status(404));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the original attempt.
    pub retries: u32,
    /// Delay before retry `n` is `backoff_factor * 2^(n-1)` seconds.
    pub backoff_factor: f64,
    /// Response status codes that are retried.
    pub force_status_codes: Vec<u16>,
    /// Cap applied to every computed delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            force_status_codes: DEFAULT_FORCE_STATUS_CODES.to_vec(),
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            retries: 0,
            ..Self::default()
        }
    }

    /// Sets the retry budget.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the backoff factor in seconds. Zero disables sleeping.
    #[must_use]
    pub const fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Replaces the retried status codes.
    #[must_use]
    pub fn with_force_status_codes(mut self, codes: impl Into<Vec<u16>>) -> Self {
        self.force_status_codes = codes.into();
        self
    }

    /// Total attempts a call may make.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Returns `true` if a response with this status should be retried.
    #[must_use]
    pub fn is_forced_status(&self, status: u16) -> bool {
        self.force_status_codes.contains(&status)
    }

    /// Returns `true` if another attempt may follow attempt number `attempt`.
    #[must_use]
    pub const fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts()
    }

    /// Decides whether a transport failure on attempt `attempt` is retried.
    #[must_use]
    pub const fn should_retry_transport(&self, failure: TransportFailure, attempt: u32) -> bool {
        if !self.has_attempts_left(attempt) {
            return false;
        }
        match failure {
            TransportFailure::Connect | TransportFailure::Read => true,
            TransportFailure::Other => false,
        }
    }

    /// Sleep before retry number `retry` (1-based).
    ///
    /// Delays are rounded to whole milliseconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.backoff_factor <= 0.0 || retry == 0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let millis = (self.backoff_factor * 1000.0 * 2f64.powi(exponent)).round();
        if !millis.is_finite() || millis >= self.max_backoff.as_millis() as f64 {
            return self.max_backoff;
        }
        Duration::from_millis(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 5);
        assert!((policy.backoff_factor - 0.3).abs() < f64::EPSILON);
        assert_eq!(policy.force_status_codes, vec![500, 502, 503, 504]);
        assert_eq!(policy.max_attempts(), 6);
    }

    #[test]
    fn test_exponential_backoff() {
        let policy = RetryPolicy::default().with_backoff_factor(0.5);
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3), Duration::from_secs(2));
        assert_eq!(policy.delay_for(4), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(40), DEFAULT_MAX_BACKOFF);
        assert_eq!(policy.delay_for(u32::MAX), DEFAULT_MAX_BACKOFF);
    }

    #[test]
    fn test_zero_factor_never_sleeps() {
        let policy = RetryPolicy::default().with_backoff_factor(0.0);
        assert_eq!(policy.delay_for(1), Duration::ZERO);
        assert_eq!(policy.delay_for(5), Duration::ZERO);
    }

    #[test]
    fn test_client_errors_are_not_forced() {
        let policy = RetryPolicy::default();
        for status in [400, 401, 403, 404, 409, 422] {
            assert!(!policy.is_forced_status(status));
        }
    }

    #[test]
    fn test_transport_retry_respects_budget() {
        let policy = RetryPolicy::default().with_retries(2);
        assert!(policy.should_retry_transport(TransportFailure::Connect, 1));
        assert!(policy.should_retry_transport(TransportFailure::Connect, 2));
        assert!(!policy.should_retry_transport(TransportFailure::Connect, 3));
    }

    #[test]
    fn test_read_and_connect_failures_are_retried() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry_transport(TransportFailure::Read, 1));
        assert!(policy.should_retry_transport(TransportFailure::Connect, 1));
    }

    #[test]
    fn test_other_failures_never_retried() {
        let policy = RetryPolicy::default();
        assert!(!policy.should_retry_transport(TransportFailure::Other, 1));
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::none();
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.has_attempts_left(1));
    }
}
