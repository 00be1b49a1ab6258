//! Stack-level deployment plans
//!
//! Diffing is artifact equality per stack, nothing finer. The plan exists so
//! the CLI can show what a deploy or destroy will touch before doing it.

use crate::state::DeployState;
use crosstack_core::StackArtifact;
use serde::{Deserialize, Serialize};

/// A planned action on one stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub action_type: ActionType,

    /// Stack the action applies to
    pub stack: String,

    /// Description of the action
    pub description: String,
}

/// Type of action to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Deploy a stack for the first time
    Create,
    /// Redeploy a changed stack
    Update,
    /// Remove a deployed stack
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Plan containing all actions to be applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,

    /// Whether the plan has any changes
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    /// Summary of the plan
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

/// Summary of planned actions
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}

/// Plan deploying the given artifacts against the current state
pub fn plan_deploy(state: &DeployState, artifacts: &[StackArtifact]) -> Plan {
    let actions = artifacts
        .iter()
        .map(|artifact| match state.stack(&artifact.stack) {
            None => Action {
                action_type: ActionType::Create,
                stack: artifact.stack.clone(),
                description: format!("deploy stack '{}'", artifact.stack),
            },
            Some(deployed) if deployed.artifact != *artifact => Action {
                action_type: ActionType::Update,
                stack: artifact.stack.clone(),
                description: format!("redeploy stack '{}'", artifact.stack),
            },
            Some(_) => Action {
                action_type: ActionType::NoOp,
                stack: artifact.stack.clone(),
                description: format!("stack '{}' is unchanged", artifact.stack),
            },
        })
        .collect();
    Plan::new(actions)
}

/// Plan removing the given stacks from the current state
pub fn plan_destroy(state: &DeployState, stacks: &[String]) -> Plan {
    let actions = stacks
        .iter()
        .filter(|name| state.stack(name).is_some())
        .map(|name| Action {
            action_type: ActionType::Delete,
            stack: name.clone(),
            description: format!("destroy stack '{}'", name),
        })
        .collect();
    Plan::new(actions)
}
