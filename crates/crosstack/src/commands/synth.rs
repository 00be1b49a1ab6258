use crate::context::Context;
use crate::wiring::{self, Variant};
use colored::Colorize;
use tokio::fs;

pub async fn handle(context: &Context, variant: Variant) -> anyhow::Result<()> {
    println!("{}", "Synthesizing demo app...".blue().bold());

    let artifacts = wiring::demo_app(variant, &context.table_name).synth()?;

    fs::create_dir_all(&context.out_dir).await?;
    for artifact in &artifacts {
        let path = context.out_dir.join(format!("{}.json", artifact.stack));
        let content = serde_json::to_string_pretty(artifact)?;
        fs::write(&path, content).await?;
        println!(
            "  ✓ {} ({} exports, {} imports) → {}",
            artifact.stack.cyan(),
            artifact.exports.len(),
            artifact.imports.len(),
            path.display()
        );
    }

    Ok(())
}
