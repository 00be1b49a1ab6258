//! Coupling phase classification
//!
//! The two-phase decoupling procedure moves a producer/consumer pair through
//! three states. Which state a live deployment is in can be read off the
//! deployed artifacts alone:
//!
//! - **coupled**: the consumer's artifact imports from the producer's
//! - **half-decoupled**: no import remains, but the producer still serves
//!   export channels for the table value
//! - **decoupled**: neither imports nor exports of the value remain
//!
//! The procedure itself (which stacks to redeploy, in which order) is wiring
//! on the CLI side; this module only answers "where are we".

use crate::state::DeployState;
use serde::{Deserialize, Serialize};

/// Live coupling state of a producer/consumer pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingPhase {
    Coupled,
    HalfDecoupled,
    Decoupled,
}

impl std::fmt::Display for CouplingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CouplingPhase::Coupled => write!(f, "coupled"),
            CouplingPhase::HalfDecoupled => write!(f, "half-decoupled"),
            CouplingPhase::Decoupled => write!(f, "decoupled"),
        }
    }
}

/// Classify the coupling between two deployed stacks around a table value.
/// Returns `None` unless both stacks are deployed.
pub fn classify(
    state: &DeployState,
    producer: &str,
    consumer: &str,
    table_name: &str,
) -> Option<CouplingPhase> {
    let producer_art = &state.stack(producer)?.artifact;
    let consumer_art = &state.stack(consumer)?.artifact;

    if !consumer_art.imports_from(producer).is_empty() {
        return Some(CouplingPhase::Coupled);
    }
    if !producer_art.exports_of_value(table_name).is_empty() {
        return Some(CouplingPhase::HalfDecoupled);
    }
    Some(CouplingPhase::Decoupled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosstack_core::{Export, Import, StackArtifact};

    fn artifact(stack: &str, exports: Vec<Export>, imports: Vec<Import>) -> StackArtifact {
        StackArtifact {
            stack: stack.to_string(),
            resources: Vec::new(),
            exports,
            imports,
            grants: Vec::new(),
        }
    }

    fn users_export(name: &str) -> Export {
        Export {
            name: name.to_string(),
            value: "Users".to_string(),
        }
    }

    #[test]
    fn classifies_all_three_phases() {
        let mut state = DeployState::new();

        // Coupled
        state
            .deploy(artifact(
                "producer",
                vec![users_export("producer:UsersTable:name")],
                Vec::new(),
            ))
            .unwrap();
        state
            .deploy(artifact(
                "consumer",
                Vec::new(),
                vec![Import {
                    export_name: "producer:UsersTable:name".to_string(),
                    from_stack: "producer".to_string(),
                }],
            ))
            .unwrap();
        assert_eq!(
            classify(&state, "producer", "consumer", "Users"),
            Some(CouplingPhase::Coupled)
        );

        // Half-decoupled: consumer dropped the import, producer still exports
        state
            .deploy(artifact("consumer", Vec::new(), Vec::new()))
            .unwrap();
        assert_eq!(
            classify(&state, "producer", "consumer", "Users"),
            Some(CouplingPhase::HalfDecoupled)
        );

        // Decoupled: producer dropped its channels
        state
            .deploy(artifact("producer", Vec::new(), Vec::new()))
            .unwrap();
        assert_eq!(
            classify(&state, "producer", "consumer", "Users"),
            Some(CouplingPhase::Decoupled)
        );
    }

    #[test]
    fn undeployed_pair_has_no_phase() {
        let state = DeployState::new();
        assert_eq!(classify(&state, "producer", "consumer", "Users"), None);
    }
}
