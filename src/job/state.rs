//! Job lifecycle states and provider-string parsing.

use std::fmt;

/// Lifecycle state of an asynchronous control-plane job.
///
/// `Completed` is the only terminal-success state; `Failed`, `Aborted` and
/// `Expired` are terminal failures; `Pending` and `Running` are transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
    Aborted,
    Expired,
}

impl JobState {
    /// Whether no further transition can occur from this state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Pending | JobState::Running)
    }

    /// Terminal success.
    pub fn is_success(self) -> bool {
        self == JobState::Completed
    }

    /// Terminal failure (failed, aborted, or expired before completing).
    pub fn is_failure(self) -> bool {
        matches!(self, JobState::Failed | JobState::Aborted | JobState::Expired)
    }

    /// Parse a provider-reported state string (the strings AWS Backup uses
    /// for backup and restore jobs). `CREATED` maps to `Pending` and
    /// `ABORTING` to `Running` since both still transition.
    pub fn parse(s: &str) -> Option<JobState> {
        match s {
            "CREATED" | "PENDING" => Some(JobState::Pending),
            "RUNNING" | "ABORTING" => Some(JobState::Running),
            "COMPLETED" => Some(JobState::Completed),
            "FAILED" => Some(JobState::Failed),
            "ABORTED" => Some(JobState::Aborted),
            "EXPIRED" => Some(JobState::Expired),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Completed => "COMPLETED",
            JobState::Failed => "FAILED",
            JobState::Aborted => "ABORTED",
            JobState::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
