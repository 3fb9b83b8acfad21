//! Retry and backoff policy for remote control-plane calls.
//!
//! This module encapsulates error classification (throttling, transient
//! unavailability, connectivity failures) and exponential backoff decisions
//! so that higher layers (job poller, orchestrator) share a consistent
//! policy. Anything the classifier does not recognize as transient is
//! treated as permanent and surfaced without consuming the retry budget.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_code, classify_message};
pub use error::RemoteError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::{run_with_retry, RetryError};
