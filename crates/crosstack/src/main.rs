mod commands;
mod context;
mod wiring;

use clap::{Parser, Subcommand};
use wiring::Variant;

#[derive(Parser)]
#[command(name = "crosstack")]
#[command(
    about = "Cross-stack coupling demo: direct references, config lookups, and the two-phase decoupling migration",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the demo app into per-stack artifact files
    Synth {
        /// How the consumer references the producer's table
        #[arg(short = 'v', long, value_enum, default_value_t = Variant::Direct)]
        variant: Variant,
    },
    /// Synthesize and deploy the demo app against the local registry
    Deploy {
        /// How the consumer references the producer's table
        #[arg(short = 'v', long, value_enum, default_value_t = Variant::Direct)]
        variant: Variant,
        /// Apply without confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show deployed stacks, their exports/imports, and the coupling phase
    Status,
    /// Run one step of the two-phase decoupling migration
    Migrate {
        /// Migration step: 1 (redeploy both, pin exports) or 2 (drop exports)
        #[arg(short, long)]
        step: u8,
    },
    /// Destroy deployed demo stacks (consumer first)
    Destroy {
        /// Apply without confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    // Version needs no context file
    if matches!(cli.command, Commands::Version) {
        println!("crosstack {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let context = context::Context::discover()?;

    match cli.command {
        Commands::Synth { variant } => commands::synth::handle(&context, variant).await,
        Commands::Deploy { variant, yes } => commands::deploy::handle(&context, variant, yes).await,
        Commands::Status => commands::status::handle(&context).await,
        Commands::Migrate { step } => commands::migrate::handle(&context, step).await,
        Commands::Destroy { yes } => commands::destroy::handle(yes).await,
        Commands::Version => Ok(()),
    }
}
