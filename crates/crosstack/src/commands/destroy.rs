use crate::wiring::{CONSUMER_STACK, PRODUCER_STACK};
use colored::Colorize;
use crosstack_deploy::{plan_destroy, StateManager};

pub async fn handle(yes: bool) -> anyhow::Result<()> {
    let manager = StateManager::new(".");
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    // Reverse of deploy order, so no export is pulled out from under an
    // importer
    let targets = [CONSUMER_STACK.to_string(), PRODUCER_STACK.to_string()];
    let plan = plan_destroy(&state, &targets);

    if !plan.has_changes {
        println!("Nothing to destroy.");
        lock.release().await?;
        return Ok(());
    }

    println!("{}", "Destroy plan:".bold());
    for action in &plan.actions {
        println!("  • [{}] {}", action.action_type, action.description);
    }

    if !yes {
        println!();
        println!("{}", "Run again with --yes to apply.".yellow());
        lock.release().await?;
        return Ok(());
    }

    println!();
    for action in &plan.actions {
        state.destroy(&action.stack)?;
        println!("  ✓ destroyed {}", action.stack.cyan());
    }

    manager.save(&state).await?;
    lock.release().await?;

    println!("{}", "✓ Destroy complete".green().bold());
    Ok(())
}
