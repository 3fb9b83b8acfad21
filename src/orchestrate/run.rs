//! Phase primitives: a retried remote call and a polled job.

use std::time::Duration;

use thiserror::Error;

use crate::job::{poll_until_terminal, ArtifactRef, JobHandle, JobState, JobStatus, PollPolicy, PollResult};
use crate::retry::{run_with_retry, RemoteError, RetryError, RetryPolicy};

/// Why an orchestrated workflow aborted. Every variant names the operation
/// or job involved and the last observed cause or state, so a failure can be
/// diagnosed without re-running the workflow.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// A retried remote call failed permanently or exhausted its budget.
    #[error(transparent)]
    Retry(#[from] RetryError),

    /// A polled job ended in a terminal failure state. Never retried.
    #[error("{resource_type} job {job_id} ended in state {state}")]
    JobFailed {
        job_id: String,
        resource_type: String,
        state: JobState,
    },

    /// A polled job did not reach a terminal state within its budget.
    /// The job's outcome is unknown, not failed.
    #[error("{resource_type} job {job_id} did not reach a terminal state within {timeout:?}")]
    JobTimedOut {
        job_id: String,
        resource_type: String,
        timeout: Duration,
    },

    /// A completed job exposed no artifact reference but the next phase
    /// needs one.
    #[error("{resource_type} job {job_id} completed without an artifact reference")]
    MissingArtifact {
        job_id: String,
        resource_type: String,
    },

    /// A fan-out branch panicked before producing a result.
    #[error("fan-out branch '{name}' panicked")]
    BranchPanicked { name: String },
}

/// Runs workflow phases with one retry policy and one poll policy. Copy
/// (cheap, all `Copy` fields) and pass by reference; the policies are fixed
/// for the lifetime of the workflow.
#[derive(Debug, Clone, Copy)]
pub struct Orchestrator {
    pub retry: RetryPolicy,
    pub poll: PollPolicy,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            poll: PollPolicy::default(),
        }
    }
}

impl Orchestrator {
    pub fn new(retry: RetryPolicy, poll: PollPolicy) -> Self {
        Self { retry, poll }
    }

    /// Phase: one idempotent remote call under the retry policy.
    pub fn call<T, F>(&self, description: &str, op: F) -> Result<T, OrchestrationError>
    where
        F: FnMut() -> Result<T, RemoteError>,
    {
        Ok(run_with_retry(&self.retry, description, op)?)
    }

    /// Phase: poll a job to its terminal state. `Failed` and `TimedOut`
    /// become errors carrying the job identity, so a `?` chain aborts the
    /// sequence on the first unrecoverable phase.
    pub fn await_job<F>(
        &self,
        handle: &JobHandle,
        query: F,
    ) -> Result<Option<ArtifactRef>, OrchestrationError>
    where
        F: FnMut(&JobHandle) -> Result<JobStatus, RemoteError>,
    {
        match poll_until_terminal(&self.poll, &self.retry, handle, query)? {
            PollResult::Completed(artifact) => {
                tracing::info!(
                    "{} job {} completed",
                    handle.resource_type,
                    handle.job_id
                );
                Ok(artifact)
            }
            PollResult::Failed(state) => Err(OrchestrationError::JobFailed {
                job_id: handle.job_id.clone(),
                resource_type: handle.resource_type.clone(),
                state,
            }),
            PollResult::TimedOut => Err(OrchestrationError::JobTimedOut {
                job_id: handle.job_id.clone(),
                resource_type: handle.resource_type.clone(),
                timeout: self.poll.timeout,
            }),
        }
    }

    /// Like `await_job`, but the next phase requires the artifact reference
    /// (e.g. a restore cannot start without the recovery point).
    pub fn await_job_artifact<F>(
        &self,
        handle: &JobHandle,
        query: F,
    ) -> Result<ArtifactRef, OrchestrationError>
    where
        F: FnMut(&JobHandle) -> Result<JobStatus, RemoteError>,
    {
        self.await_job(handle, query)?
            .ok_or_else(|| OrchestrationError::MissingArtifact {
                job_id: handle.job_id.clone(),
                resource_type: handle.resource_type.clone(),
            })
    }
}
