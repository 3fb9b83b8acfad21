//! Asynchronous job handles, states, and the polling state machine.
//!
//! A control-plane job (backup, restore) is started remotely and then
//! observed via status queries until it reaches a terminal state. The same
//! poller drives both backup and restore jobs; only the injected status
//! query differs.

mod poller;
mod state;

pub use poller::{poll_until_terminal, PollPolicy, PollResult};
pub use state::JobState;

/// Opaque reference to the artifact a completed job produced (a recovery
/// point ARN, a restored resource identifier, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies an asynchronous remote job and the resource type it targets.
/// Owned by the caller; the poller only borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
    pub resource_type: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// Snapshot returned by one status query: the current state and, once the
/// job completed, the artifact reference it produced.
#[derive(Debug, Clone)]
pub struct JobStatus {
    pub state: JobState,
    pub artifact: Option<ArtifactRef>,
}

impl JobStatus {
    pub fn new(state: JobState) -> Self {
        Self {
            state,
            artifact: None,
        }
    }

    pub fn with_artifact(state: JobState, artifact: ArtifactRef) -> Self {
        Self {
            state,
            artifact: Some(artifact),
        }
    }
}
