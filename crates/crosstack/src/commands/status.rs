use crate::context::Context;
use crate::wiring::{CONSUMER_STACK, PRODUCER_STACK};
use colored::Colorize;
use crosstack_deploy::{classify, StateManager};

pub async fn handle(context: &Context) -> anyhow::Result<()> {
    let manager = StateManager::new(".");
    let state = manager.load().await?;

    if state.is_empty() {
        println!("No stacks deployed");
        return Ok(());
    }

    for (name, deployed) in state.iter() {
        println!(
            "{} ({} resources, deployed {})",
            name.cyan().bold(),
            deployed.artifact.resources.len(),
            deployed.deployed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        for export in &deployed.artifact.exports {
            println!("  export {} = \"{}\"", export.name, export.value);
        }
        for import in &deployed.artifact.imports {
            println!("  import {} from {}", import.export_name, import.from_stack);
        }
        for grant in &deployed.artifact.grants {
            println!(
                "  grant {} on \"{}\" to {}",
                grant.access, grant.table_name, grant.function
            );
        }
    }

    // A name-based reference gives no build-time guarantee the table exists;
    // the best the registry can do is flag unmatched names after the fact
    for (name, deployed) in state.iter() {
        for grant in &deployed.artifact.grants {
            let declared = state
                .iter()
                .any(|(_, d)| d.artifact.declares_table(&grant.table_name));
            if !declared {
                println!(
                    "{}",
                    format!(
                        "⚠ table \"{}\" granted in stack '{}' is not declared by any deployed stack",
                        grant.table_name, name
                    )
                    .yellow()
                );
            }
        }
    }

    if let Some(phase) = classify(&state, PRODUCER_STACK, CONSUMER_STACK, &context.table_name) {
        println!();
        println!("demo pair phase: {}", phase.to_string().bold());
    }

    Ok(())
}
