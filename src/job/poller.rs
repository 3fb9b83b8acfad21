//! Poll an asynchronous job until it reaches a terminal state.

use std::time::{Duration, Instant};

use crate::retry::{run_with_retry, RemoteError, RetryError, RetryPolicy};

use super::{ArtifactRef, JobHandle, JobState, JobStatus};

/// Polling cadence and wall-clock budget for one job.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Fixed delay between status queries.
    pub interval: Duration,
    /// Hard wall-clock budget; may be exceeded by at most one interval plus
    /// the in-flight query at the boundary.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Terminal outcome of polling one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    /// The job reached `Completed`, with the artifact reference the final
    /// status query exposed (if any).
    Completed(Option<ArtifactRef>),
    /// The job reached a terminal failure state; the state is the reason.
    /// This is never retried — only the status *query* is.
    Failed(JobState),
    /// The wall-clock budget elapsed before any terminal state was observed.
    /// Outcome of the job is unknown, not failed.
    TimedOut,
}

/// Queries the job's state at a fixed interval until it is terminal or the
/// timeout elapses. The status query is itself a remote call and runs under
/// `run_with_retry`; a permanently failing or exhausted query propagates as
/// `RetryError`.
///
/// The first observed state may already be terminal; a state once observed
/// terminal is never re-polled.
pub fn poll_until_terminal<F>(
    poll: &PollPolicy,
    retry: &RetryPolicy,
    handle: &JobHandle,
    mut query: F,
) -> Result<PollResult, RetryError>
where
    F: FnMut(&JobHandle) -> Result<JobStatus, RemoteError>,
{
    let description = format!("describe {} job {}", handle.resource_type, handle.job_id);
    let start = Instant::now();
    loop {
        let status = run_with_retry(retry, &description, || query(handle))?;
        tracing::debug!(
            "{} job {} state: {}",
            handle.resource_type,
            handle.job_id,
            status.state
        );

        if status.state.is_success() {
            return Ok(PollResult::Completed(status.artifact));
        }
        if status.state.is_failure() {
            return Ok(PollResult::Failed(status.state));
        }

        if start.elapsed() >= poll.timeout {
            return Ok(PollResult::TimedOut);
        }
        std::thread::sleep(poll.interval);
    }
}
