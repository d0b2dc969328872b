//! asg-rollout - plan concurrency-bounded ASG rolling upgrades
//!
//! Reads ASG membership snapshots and prints, per ASG, the next batch of
//! instances a rolling upgrade would act on.

use clap::{Parser, Subcommand};
use rollout_selector::RolloutConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod snapshot;

use error::CliResult;

/// asg-rollout CLI
#[derive(Parser)]
#[command(name = "asg-rollout")]
#[command(about = "Plan concurrency-bounded rolling upgrades of Auto Scaling Groups", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ROLLOUT_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "ROLLOUT_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "ROLLOUT_LOG_JSON", global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select the next restack batch for each ASG in a snapshot
    Plan(commands::plan::PlanArgs),
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.to_string().into());

    // logs go to stderr so stdout stays parseable
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = RolloutConfig::load(cli.config.as_deref())?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    init_tracing(&level, cli.log_json || config.logging.json);

    match cli.command {
        Commands::Plan(args) => commands::plan::run(args, &config).await,
    }
}
