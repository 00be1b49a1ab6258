//! Deployment rules over the registry state
//!
//! Two invariants, checked before any state change:
//!
//! 1. An export that another deployed artifact imports can be neither
//!    removed nor re-valued. The rejection names the dependent artifact.
//! 2. Every import of an incoming artifact must resolve against an export
//!    some deployed artifact provides.
//!
//! Name-based references are not checked here at all: a wrong name is a
//! runtime failure on the real platform and stays out of scope.

use crate::error::{DeployError, Result};
use crate::state::{DeployState, DeployedStack};
use chrono::Utc;
use crosstack_core::StackArtifact;

impl DeployState {
    /// First deployed stack (other than `excluding`) importing the export
    pub fn importer_of(&self, export_name: &str, excluding: &str) -> Option<&str> {
        self.iter()
            .filter(|(name, _)| name.as_str() != excluding)
            .find(|(_, deployed)| {
                deployed
                    .artifact
                    .imports
                    .iter()
                    .any(|i| i.export_name == export_name)
            })
            .map(|(name, _)| name.as_str())
    }

    fn check_exports_still_served(&self, incoming: &StackArtifact) -> Result<()> {
        let Some(current) = self.stack(&incoming.stack) else {
            return Ok(());
        };
        for export in &current.artifact.exports {
            let kept = incoming
                .export(&export.name)
                .is_some_and(|e| e.value == export.value);
            if kept {
                continue;
            }
            if let Some(importer) = self.importer_of(&export.name, &incoming.stack) {
                return Err(DeployError::ExportInUse {
                    export: export.name.clone(),
                    importer: importer.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_imports_resolvable(&self, incoming: &StackArtifact) -> Result<()> {
        for import in &incoming.imports {
            let served = self
                .stack(&import.from_stack)
                .and_then(|deployed| deployed.artifact.export(&import.export_name))
                .is_some();
            if !served {
                return Err(DeployError::ExportNotFound {
                    stack: incoming.stack.clone(),
                    export: import.export_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Deploy (create or redeploy) a stack artifact
    pub fn deploy(&mut self, artifact: StackArtifact) -> Result<()> {
        self.check_exports_still_served(&artifact)?;
        self.check_imports_resolvable(&artifact)?;

        let deployed = match self.stack(&artifact.stack) {
            Some(existing) => DeployedStack {
                artifact: artifact.clone(),
                deployed_at: existing.deployed_at,
                updated_at: Utc::now(),
            },
            None => DeployedStack::new(artifact.clone()),
        };
        tracing::info!("Deployed stack '{}'", artifact.stack);
        self.set_stack(artifact.stack, deployed);
        Ok(())
    }

    /// Remove a deployed stack
    pub fn destroy(&mut self, stack: &str) -> Result<DeployedStack> {
        let deployed = self
            .stack(stack)
            .ok_or_else(|| DeployError::StackNotDeployed(stack.to_string()))?;

        for export in &deployed.artifact.exports {
            if let Some(importer) = self.importer_of(&export.name, stack) {
                return Err(DeployError::ExportInUse {
                    export: export.name.clone(),
                    importer: importer.to_string(),
                });
            }
        }

        tracing::info!("Destroyed stack '{}'", stack);
        self.remove_stack(stack)
            .ok_or_else(|| DeployError::StackNotDeployed(stack.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosstack_core::{
        auto_export_name, App, EnvValue, FunctionSpec, KeyAttribute, KeyType, Stack, TableRef,
        TableSpec,
    };

    fn producer_stack() -> Stack {
        let mut stack = Stack::new("producer");
        stack.add_table(TableSpec::new(
            "UsersTable",
            "Users",
            KeyAttribute::new("userId", KeyType::String),
        ));
        stack
    }

    fn consumer_stack(table: TableRef) -> Stack {
        let mut stack = Stack::new("consumer");
        stack.add_function(
            FunctionSpec::new("ReadUsers", "index.handler", "node22")
                .with_env("USERS_TABLE_NAME", EnvValue::TableName(table.clone())),
        );
        stack.grant_read("ReadUsers", table);
        stack
    }

    /// Producer + consumer coupled through a handle
    fn coupled_artifacts() -> Vec<StackArtifact> {
        let producer = producer_stack();
        let handle = producer.table_handle("UsersTable").unwrap();
        let mut app = App::new();
        app.add_stack(producer);
        app.add_stack(consumer_stack(TableRef::ByHandle(handle)));
        app.synth().unwrap()
    }

    /// Producer pinning both export channels + consumer re-pointed by name
    fn half_decoupled_artifacts() -> Vec<StackArtifact> {
        let mut producer = producer_stack();
        producer.export_table_name(auto_export_name("producer", "UsersTable"), "UsersTable");
        producer.export_table_name("producer:UsersTable:name:migration", "UsersTable");
        let mut app = App::new();
        app.add_stack(producer);
        app.add_stack(consumer_stack(TableRef::ByName("Users".into())));
        app.synth().unwrap()
    }

    /// Producer with no exports + consumer by name
    fn decoupled_artifacts() -> Vec<StackArtifact> {
        let mut app = App::new();
        app.add_stack(producer_stack());
        app.add_stack(consumer_stack(TableRef::ByName("Users".into())));
        app.synth().unwrap()
    }

    fn deploy_all(state: &mut DeployState, artifacts: Vec<StackArtifact>) {
        for artifact in artifacts {
            state.deploy(artifact).unwrap();
        }
    }

    #[test]
    fn removing_imported_export_is_rejected_naming_importer() {
        let mut state = DeployState::new();
        deploy_all(&mut state, coupled_artifacts());

        // Producer redeployed without the export while the consumer still
        // imports it
        let producer = decoupled_artifacts().remove(0);
        match state.deploy(producer) {
            Err(DeployError::ExportInUse { export, importer }) => {
                assert_eq!(export, "producer:UsersTable:name");
                assert_eq!(importer, "consumer");
            }
            other => panic!("expected ExportInUse, got {other:?}"),
        }
    }

    #[test]
    fn changing_imported_export_value_is_rejected() {
        let mut state = DeployState::new();
        deploy_all(&mut state, coupled_artifacts());

        // Rename the table without decoupling first: same export channel,
        // different value
        let renamed = {
            let mut producer = Stack::new("producer");
            producer.add_table(TableSpec::new(
                "UsersTable",
                "Customers",
                KeyAttribute::new("userId", KeyType::String),
            ));
            producer.export_table_name(auto_export_name("producer", "UsersTable"), "UsersTable");
            let mut app = App::new();
            app.add_stack(producer);
            app.synth().unwrap().remove(0)
        };

        assert!(matches!(
            state.deploy(renamed),
            Err(DeployError::ExportInUse { .. })
        ));
    }

    #[test]
    fn unresolvable_import_is_rejected() {
        let mut state = DeployState::new();
        let consumer = coupled_artifacts().remove(1);

        // Consumer deployed before any producer provides the export
        assert!(matches!(
            state.deploy(consumer),
            Err(DeployError::ExportNotFound { .. })
        ));
    }

    #[test]
    fn destroying_imported_producer_is_rejected() {
        let mut state = DeployState::new();
        deploy_all(&mut state, coupled_artifacts());

        assert!(matches!(
            state.destroy("producer"),
            Err(DeployError::ExportInUse { .. })
        ));

        // Consumer first, then producer, works
        state.destroy("consumer").unwrap();
        state.destroy("producer").unwrap();
        assert!(state.is_empty());
    }

    /// The two-phase procedure in order: every deploy is accepted, and the
    /// artifacts match the expected shape at each phase.
    #[test]
    fn two_phase_decoupling_in_order() {
        let mut state = DeployState::new();
        deploy_all(&mut state, coupled_artifacts());

        // Phase A -> B: both stacks redeployed together
        let phase_b = half_decoupled_artifacts();
        assert_eq!(phase_b[0].exports_of_value("Users").len(), 2);
        assert!(phase_b[1].imports.is_empty());
        deploy_all(&mut state, phase_b);

        // Phase B -> C: producer alone drops every export channel
        let producer_c = decoupled_artifacts().remove(0);
        assert!(producer_c.exports_of_value("Users").is_empty());
        state.deploy(producer_c).unwrap();

        let deployed = &state.stack("producer").unwrap().artifact;
        assert!(deployed.exports.is_empty());
    }

    /// Skipping phase B hits exactly the rejection the procedure avoids.
    #[test]
    fn skipping_half_decoupled_phase_is_rejected() {
        let mut state = DeployState::new();
        deploy_all(&mut state, coupled_artifacts());

        let producer_c = decoupled_artifacts().remove(0);
        assert!(matches!(
            state.deploy(producer_c),
            Err(DeployError::ExportInUse { .. })
        ));
    }

    #[test]
    fn redeploy_preserves_first_deploy_timestamp() {
        let mut state = DeployState::new();
        deploy_all(&mut state, coupled_artifacts());
        let first = state.stack("producer").unwrap().deployed_at;

        deploy_all(&mut state, half_decoupled_artifacts());
        let redeployed = state.stack("producer").unwrap();
        assert_eq!(redeployed.deployed_at, first);
        assert!(redeployed.updated_at >= first);
    }
}
