//! Scripted in-memory control plane for integration tests.
//!
//! Jobs advance one state per describe call (Pending → Running → terminal),
//! and the script can inject throttled start calls, terminal failures, and
//! jobs that never finish. Artifact references derive from the resource id,
//! so reruns of an idempotent workflow produce identical references.

use std::collections::HashMap;
use std::sync::Mutex;

use drover::job::{ArtifactRef, JobHandle, JobState, JobStatus};
use drover::orchestrate::{ControlPlane, Resource};
use drover::retry::RemoteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobKind {
    Backup,
    Restore,
}

#[derive(Debug)]
struct Job {
    resource_id: String,
    kind: JobKind,
    describes: u32,
    terminal: JobState,
    stuck: bool,
}

#[derive(Debug, Default)]
struct State {
    next_job: u32,
    jobs: HashMap<String, Job>,
    throttled_starts_remaining: u32,
    backup_failures: HashMap<String, JobState>,
    stuck_backups: Vec<String>,
    /// Ordered record of every start and completion, for phase-ordering asserts.
    events: Vec<String>,
}

/// Fake control plane with scripted behavior. `Mutex` keeps it `Sync` so the
/// parallel workflow can share one instance across branches.
#[derive(Debug, Default)]
pub struct FakeControlPlane {
    state: Mutex<State>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first `n` start calls (backup or restore) fail with a throttling
    /// code before succeeding.
    pub fn throttle_first_starts(self, n: u32) -> Self {
        self.state.lock().unwrap().throttled_starts_remaining = n;
        self
    }

    /// The backup job for `resource_id` ends in the given terminal failure
    /// state instead of completing.
    pub fn fail_backup(self, resource_id: &str, state: JobState) -> Self {
        assert!(state.is_failure());
        self.state
            .lock()
            .unwrap()
            .backup_failures
            .insert(resource_id.to_string(), state);
        self
    }

    /// The backup job for `resource_id` never leaves Running.
    pub fn stick_backup(self, resource_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .stuck_backups
            .push(resource_id.to_string());
        self
    }

    /// Ordered start/completion events observed so far.
    pub fn events(&self) -> Vec<String> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn event_index(&self, event: &str) -> Option<usize> {
        self.events().iter().position(|e| e == event)
    }

    fn start_job(
        &self,
        kind: JobKind,
        resource_id: &str,
        resource_type: &str,
    ) -> Result<JobHandle, RemoteError> {
        let mut state = self.state.lock().unwrap();
        if state.throttled_starts_remaining > 0 {
            state.throttled_starts_remaining -= 1;
            return Err(RemoteError::coded("ThrottlingException", "rate exceeded"));
        }

        state.next_job += 1;
        let job_id = format!("job-{:04}", state.next_job);
        let (terminal, stuck) = match kind {
            JobKind::Backup => (
                state
                    .backup_failures
                    .get(resource_id)
                    .copied()
                    .unwrap_or(JobState::Completed),
                state.stuck_backups.iter().any(|r| r == resource_id),
            ),
            JobKind::Restore => (JobState::Completed, false),
        };
        let label = match kind {
            JobKind::Backup => "backup",
            JobKind::Restore => "restore",
        };
        state.events.push(format!("start-{}:{}", label, resource_id));
        state.jobs.insert(
            job_id.clone(),
            Job {
                resource_id: resource_id.to_string(),
                kind,
                describes: 0,
                terminal,
                stuck,
            },
        );
        Ok(JobHandle::new(job_id, resource_type))
    }
}

impl ControlPlane for FakeControlPlane {
    fn start_backup(&self, resource: &Resource) -> Result<JobHandle, RemoteError> {
        self.start_job(JobKind::Backup, &resource.id, &resource.resource_type)
    }

    fn describe_job(&self, handle: &JobHandle) -> Result<JobStatus, RemoteError> {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        let job = state
            .jobs
            .get_mut(&handle.job_id)
            .ok_or_else(|| RemoteError::message(format!("no such job {}", handle.job_id)))?;
        job.describes += 1;
        let status = match job.describes {
            1 => JobStatus::new(JobState::Pending),
            2 => JobStatus::new(JobState::Running),
            _ if job.stuck => JobStatus::new(JobState::Running),
            _ => match (job.terminal, job.kind) {
                (JobState::Completed, JobKind::Backup) => JobStatus::with_artifact(
                    JobState::Completed,
                    ArtifactRef::new(format!("rp-{}", job.resource_id)),
                ),
                (JobState::Completed, JobKind::Restore) => JobStatus::with_artifact(
                    JobState::Completed,
                    ArtifactRef::new(format!("restored-{}", job.resource_id)),
                ),
                (terminal, _) => JobStatus::new(terminal),
            },
        };
        if status.state.is_terminal() {
            let label = match job.kind {
                JobKind::Backup => "backup",
                JobKind::Restore => "restore",
            };
            let resource_id = job.resource_id.clone();
            let state_name = status.state.to_string();
            state
                .events
                .push(format!("{}-{}:{}", label, state_name, resource_id));
        }
        Ok(status)
    }

    fn start_restore(
        &self,
        recovery_point: &ArtifactRef,
        resource_type: &str,
    ) -> Result<JobHandle, RemoteError> {
        let resource_id = recovery_point
            .as_str()
            .strip_prefix("rp-")
            .ok_or_else(|| {
                RemoteError::message(format!("unknown recovery point {}", recovery_point))
            })?
            .to_string();
        self.start_job(JobKind::Restore, &resource_id, resource_type)
    }
}
