use crate::context::Context;
use crate::wiring::{self, CONSUMER_STACK, PRODUCER_STACK};
use colored::Colorize;
use crosstack_deploy::{classify, StateManager};

pub async fn handle(context: &Context, step: u8) -> anyhow::Result<()> {
    let manager = StateManager::new(".");
    let lock = manager.acquire_lock().await?;
    let mut state = manager.load().await?;

    match step {
        // A -> B: pin the original export channel plus a dummy channel on
        // the producer, re-point the consumer at the plain name, redeploy
        // both together
        1 => {
            println!(
                "{}",
                "Step 1/2: pin export channels, re-point the consumer".bold()
            );
            let artifacts = wiring::half_decoupled_app(&context.table_name).synth()?;
            for artifact in artifacts {
                let stack = artifact.stack.clone();
                state.deploy(artifact)?;
                println!("  ✓ redeployed {}", stack.cyan());
            }
        }
        // B -> C: drop every pinned channel, redeploy the producer alone
        2 => {
            println!("{}", "Step 2/2: drop the pinned export channels".bold());
            let producer = wiring::decoupled_app(&context.table_name)
                .synth()?
                .into_iter()
                .find(|a| a.stack == PRODUCER_STACK)
                .ok_or_else(|| anyhow::anyhow!("demo app has no producer stack"))?;
            state.deploy(producer)?;
            println!("  ✓ redeployed {}", PRODUCER_STACK.cyan());
        }
        other => {
            lock.release().await?;
            anyhow::bail!("invalid migration step: {} (expected 1 or 2)", other);
        }
    }

    manager.save(&state).await?;
    lock.release().await?;

    if let Some(phase) = classify(&state, PRODUCER_STACK, CONSUMER_STACK, &context.table_name) {
        println!("demo pair phase: {}", phase.to_string().bold());
    }

    Ok(())
}
