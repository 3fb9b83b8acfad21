use std::time::Duration;

/// High-level classification of a remote failure for retry purposes.
///
/// This intentionally stays generic; the classifier maps provider condition
/// codes and message text into these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Provider asked us to slow down (rate limits, request quotas).
    Throttled,
    /// Service reported itself temporarily unavailable.
    Unavailable,
    /// Internal/server-side error (5xx-class).
    ServerError,
    /// Operation or connection timed out.
    Timeout,
    /// Network-level failure (connection refused/reset, DNS).
    Connection,
    /// Conflicting or concurrent modification; resolves once the other
    /// operation settles.
    Conflict,
    /// Any other error (validation, authorization, unknown). Not retried.
    Other,
}

impl ErrorKind {
    /// Whether this kind of failure is presumed to self-resolve with time.
    pub fn is_retryable(self) -> bool {
        self != ErrorKind::Other
    }
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy with an attempt budget and a delay ceiling.
///
/// Defaults match the provider-facing tuning the harness shipped with:
/// 3 attempts, 5s initial delay, 60s ceiling, doubling per attempt.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// First backoff delay.
    pub initial_delay: Duration,
    /// Upper bound on any backoff delay.
    pub max_delay: Duration,
    /// Multiplicative growth factor per attempt (>= 1.0).
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(5),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `attempt_index` (zero-based):
    /// `initial_delay * multiplier^attempt_index`, capped at `max_delay`.
    ///
    /// Pure; saturates at `max_delay` instead of overflowing for large
    /// indices.
    pub fn delay_for_attempt(&self, attempt_index: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(attempt_index.min(i32::MAX as u32) as i32);
        let raw = self.initial_delay.as_secs_f64() * factor;
        if !raw.is_finite() || raw >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(raw)
    }

    /// Decide whether to retry after a failed attempt.
    ///
    /// `attempt` is 1-based (1 = first attempt). Returns
    /// `RetryDecision::NoRetry` when the error is permanent or the budget is
    /// spent, so the final attempt never sleeps.
    pub fn decide(&self, attempt: u32, kind: ErrorKind) -> RetryDecision {
        if !kind.is_retryable() || attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay_for_attempt(attempt.saturating_sub(1)))
    }
}
