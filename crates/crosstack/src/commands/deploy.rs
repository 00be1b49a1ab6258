use crate::context::Context;
use crate::wiring::{self, Variant};
use colored::Colorize;
use crosstack_deploy::{plan_deploy, StateManager};

pub async fn handle(context: &Context, variant: Variant, yes: bool) -> anyhow::Result<()> {
    let artifacts = wiring::demo_app(variant, &context.table_name).synth()?;

    let manager = StateManager::new(".");
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    let plan = plan_deploy(&state, &artifacts);
    println!("{}", "Deployment plan:".bold());
    for action in &plan.actions {
        println!("  • [{}] {}", action.action_type, action.description);
    }
    println!("{}", plan.summary());

    if !plan.has_changes {
        println!("{}", "Nothing to do.".green());
        lock.release().await?;
        return Ok(());
    }

    if !yes {
        println!();
        println!("{}", "Run again with --yes to apply.".yellow());
        lock.release().await?;
        return Ok(());
    }

    println!();
    // Definition order is deploy order: the producer goes first, so the
    // consumer's imports always resolve
    for artifact in artifacts {
        let stack = artifact.stack.clone();
        state.deploy(artifact)?;
        println!("  ✓ deployed {}", stack.cyan());
    }

    manager.save(&state).await?;
    lock.release().await?;

    println!("{}", "✓ Deploy complete".green().bold());
    Ok(())
}
