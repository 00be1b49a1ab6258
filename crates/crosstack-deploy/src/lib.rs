//! Simulated deployment surface for crosstack
//!
//! This crate stands in for the platform side of the demo: a registry of
//! deployed stack artifacts persisted under `.crosstack/`, with exactly the
//! validation the coupling lesson needs — an export that another deployed
//! artifact still imports cannot be removed or re-valued, and the rejection
//! names the dependent artifact.
//!
//! It deliberately implements nothing more of a deployment engine: no
//! dependency graph, no per-resource diffing, no lifecycle state machine.
//! Plans are stack-granular and every failed operation is terminal for that
//! attempt.

pub mod error;
pub mod migration;
pub mod plan;
pub mod registry;
pub mod state;

// Re-exports
pub use error::{DeployError, Result};
pub use migration::{classify, CouplingPhase};
pub use plan::{plan_deploy, plan_destroy, Action, ActionType, Plan, PlanSummary};
pub use state::{DeployState, DeployedStack, StateLock, StateManager};
