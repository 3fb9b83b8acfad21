//! Retry loop: run a remote call until success or the policy says stop.

use std::fmt;

use super::classify;
use super::error::RemoteError;
use super::policy::{RetryDecision, RetryPolicy};

/// Why a retried operation ultimately failed.
#[derive(Debug)]
pub enum RetryError {
    /// The error was classified permanent; no retry budget was consumed.
    NonRetryable {
        description: String,
        cause: RemoteError,
    },
    /// Every permitted attempt failed with a transient error.
    Exhausted {
        description: String,
        attempts: u32,
        cause: RemoteError,
    },
}

impl RetryError {
    /// The last observed remote error.
    pub fn cause(&self) -> &RemoteError {
        match self {
            RetryError::NonRetryable { cause, .. } => cause,
            RetryError::Exhausted { cause, .. } => cause,
        }
    }
}

impl fmt::Display for RetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::NonRetryable { description, cause } => {
                write!(f, "{} failed with non-retryable error: {}", description, cause)
            }
            RetryError::Exhausted {
                description,
                attempts,
                cause,
            } => {
                write!(f, "{} failed after {} attempts: {}", description, attempts, cause)
            }
        }
    }
}

impl std::error::Error for RetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.cause())
    }
}

/// Runs a remote call until it succeeds or the retry policy says to stop.
///
/// Success returns immediately. A failure classified permanent aborts at once
/// without consuming the remaining budget. A transient failure sleeps for the
/// backoff delay and tries again; the final attempt never sleeps. On
/// exhaustion the last observed cause is the one surfaced.
///
/// The operation must be idempotent: it may be invoked up to
/// `policy.max_attempts` times.
pub fn run_with_retry<T, F>(
    policy: &RetryPolicy,
    description: &str,
    mut f: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Result<T, RemoteError>,
{
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                if !kind.is_retryable() {
                    return Err(RetryError::NonRetryable {
                        description: description.to_string(),
                        cause: e,
                    });
                }
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        return Err(RetryError::Exhausted {
                            description: description.to_string(),
                            attempts: policy.max_attempts,
                            cause: e,
                        });
                    }
                    RetryDecision::RetryAfter(delay) => {
                        tracing::warn!(
                            "{} failed (attempt {}/{}), retrying in {:?}: {}",
                            description,
                            attempt,
                            policy.max_attempts,
                            delay,
                            e
                        );
                        std::thread::sleep(delay);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
