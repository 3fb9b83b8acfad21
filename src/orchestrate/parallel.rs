//! Fan out independent branches across OS threads and join them all.
//!
//! Used when one workflow phase covers several independent resources (e.g.
//! backing up a volume, an instance, and a table at once). Every branch is
//! always joined before this returns, so a failing branch never leaves a
//! sibling running past the join point, and a sibling's success never masks
//! the failure.

use super::run::OrchestrationError;

/// Runs each named branch on its own thread and joins them all. Results are
/// returned in branch order. The first branch error (in branch order) is
/// surfaced after every branch has finished; a panicking branch is reported
/// as its own error.
pub fn run_branches_parallel<T, F>(
    branches: Vec<(String, F)>,
) -> Result<Vec<T>, OrchestrationError>
where
    T: Send,
    F: FnOnce() -> Result<T, OrchestrationError> + Send,
{
    std::thread::scope(|scope| {
        let handles: Vec<_> = branches
            .into_iter()
            .map(|(name, f)| (name, scope.spawn(f)))
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        let mut first_error: Option<OrchestrationError> = None;
        for (name, handle) in handles {
            match handle.join() {
                Ok(Ok(value)) => results.push(value),
                Ok(Err(e)) => {
                    tracing::warn!("fan-out branch '{}' failed: {}", name, e);
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
                Err(_) => {
                    if first_error.is_none() {
                        first_error = Some(OrchestrationError::BranchPanicked { name });
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(results),
        }
    })
}
