//! Thinkloop CLI — the main entry point.
//!
//! Commands:
//! - `run`      — Solve a single task
//! - `chat`     — Read tasks from stdin, one per line
//! - `tools`    — Show the tool catalog
//! - `demo`     — Run the predefined demonstration tasks
//! - `scenarios` — Run the scenario benchmark and report a success rate
//! - `onboard`  — Write the default config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "thinkloop",
    about = "Thinkloop — a ReAct agent that reasons, acts with tools, and observes",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging and print the reasoning trace
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of ~/.thinkloop/config.toml
    #[arg(short, long, global = true, env = "THINKLOOP_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single task
    Run {
        /// The task to solve
        task: String,

        /// Override the iteration budget
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Override the model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Interactive mode: one task per line, `exit` to quit
    Chat,

    /// List the available tools
    Tools,

    /// Run the predefined demonstration tasks
    Demo {
        /// Run only the N-th task (1-based)
        #[arg(short, long)]
        index: Option<usize>,
    },

    /// Run the scenario benchmark and print a pass/fail summary
    Scenarios {
        /// Run only the N-th scenario (1-based); all by default
        #[arg(short, long)]
        scenario: Option<usize>,
    },

    /// Initialize the configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = commands::Context {
        config_path: cli.config,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Run {
            task,
            max_iterations,
            model,
        } => {
            let overrides = commands::Overrides {
                max_iterations,
                model,
            };
            commands::run::run(&ctx, &task, overrides).await?
        }
        Commands::Chat => commands::chat::run(&ctx).await?,
        Commands::Tools => commands::tools::run(&ctx)?,
        Commands::Demo { index } => commands::demo::run(&ctx, index).await?,
        Commands::Scenarios { scenario } => commands::scenarios::run(&ctx, scenario).await?,
        Commands::Onboard => commands::onboard::run(&ctx)?,
    }

    Ok(())
}
