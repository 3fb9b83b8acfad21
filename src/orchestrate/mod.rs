//! Multi-phase orchestration of remote calls and job polling.
//!
//! A workflow is an ordered list of phases; each phase is either a retried
//! remote call or a polled job, and a phase starts only after the previous
//! one succeeded. The first unrecoverable error aborts the whole sequence;
//! no rollback is attempted here. Independent resources can be fanned out
//! across threads, with all branches joined before the workflow advances.

mod parallel;
mod run;
mod workflow;

pub use parallel::run_branches_parallel;
pub use run::{OrchestrationError, Orchestrator};
pub use workflow::{backup_then_restore, Concurrency, ControlPlane, Resource, RestoredResource};
