//! Backup-then-restore workflow over an injected control plane.
//!
//! Four phases per resource, each feeding the next: start the backup job,
//! poll it to completion (its recovery point feeds the restore), start the
//! restore job, poll that to completion. Resources are processed
//! sequentially unless the caller explicitly asks for fan-out.

use crate::job::{ArtifactRef, JobHandle, JobStatus};
use crate::retry::RemoteError;

use super::parallel::run_branches_parallel;
use super::run::{OrchestrationError, Orchestrator};

/// The remote capabilities the workflow drives. Supplied by the
/// provisioning layer; every method is an idempotent remote call and may be
/// invoked up to the retry budget per phase.
pub trait ControlPlane: Sync {
    /// Start a backup job for the resource; returns the job handle.
    fn start_backup(&self, resource: &Resource) -> Result<JobHandle, RemoteError>;

    /// Current status of a backup or restore job.
    fn describe_job(&self, handle: &JobHandle) -> Result<JobStatus, RemoteError>;

    /// Start a restore job from a recovery point; returns the job handle.
    fn start_restore(
        &self,
        recovery_point: &ArtifactRef,
        resource_type: &str,
    ) -> Result<JobHandle, RemoteError>;
}

/// A resource to back up and restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub id: String,
    pub resource_type: String,
}

impl Resource {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// How to process multiple independent resources within one workflow phase.
/// Sequential is the default reading; parallel fans out one thread per
/// resource and joins them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    #[default]
    Sequential,
    Parallel,
}

/// Outcome of one resource's backup-then-restore pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredResource {
    pub resource: Resource,
    /// Recovery point the backup job produced.
    pub recovery_point: ArtifactRef,
    /// Reference to the restored resource, when the restore job exposed one.
    pub restored: Option<ArtifactRef>,
}

/// Drives every resource through backup and restore. The first unrecoverable
/// error (a permanently failing call, an exhausted retry budget, a job
/// ending in a failure state, or a poll timeout) aborts the workflow; no
/// rollback of already-completed phases is attempted.
pub fn backup_then_restore<P: ControlPlane>(
    orch: &Orchestrator,
    plane: &P,
    resources: &[Resource],
    mode: Concurrency,
) -> Result<Vec<RestoredResource>, OrchestrationError> {
    match mode {
        Concurrency::Sequential => resources
            .iter()
            .map(|resource| drive_one(orch, plane, resource))
            .collect(),
        Concurrency::Parallel => {
            let branches = resources
                .iter()
                .map(|resource| {
                    let name = format!("{} {}", resource.resource_type, resource.id);
                    (name, move || drive_one(orch, plane, resource))
                })
                .collect();
            run_branches_parallel(branches)
        }
    }
}

fn drive_one<P: ControlPlane>(
    orch: &Orchestrator,
    plane: &P,
    resource: &Resource,
) -> Result<RestoredResource, OrchestrationError> {
    let backup = orch.call(
        &format!("start backup job for {} {}", resource.resource_type, resource.id),
        || plane.start_backup(resource),
    )?;
    tracing::info!(
        "started backup job {} for {} {}",
        backup.job_id,
        resource.resource_type,
        resource.id
    );

    let recovery_point = orch.await_job_artifact(&backup, |h| plane.describe_job(h))?;

    let restore = orch.call(
        &format!("start restore job for {} {}", resource.resource_type, resource.id),
        || plane.start_restore(&recovery_point, &resource.resource_type),
    )?;
    tracing::info!(
        "started restore job {} from {}",
        restore.job_id,
        recovery_point
    );

    let restored = orch.await_job(&restore, |h| plane.describe_job(h))?;

    Ok(RestoredResource {
        resource: resource.clone(),
        recovery_point,
        restored,
    })
}
