/// Reel Sim - replay scripted playback scenarios against a session
use clap::{Parser, Subcommand};
use reel_playback::{format_time, PlayerConfig, SourceCatalog};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "reel-sim")]
#[command(about = "Reel video player scenario simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario and print events as JSON lines
    Run {
        /// Scenario file (JSON)
        scenario: PathBuf,
        /// Player configuration file
        #[arg(short, long, env = "REEL_CONFIG")]
        config: Option<PathBuf>,
        /// Source catalog file (JSON)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Format seconds as M:SS
    FormatTime {
        /// Seconds
        #[arg(allow_negative_numbers = true)]
        seconds: f64,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout carries the event stream, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_playback=info,reel_sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            catalog,
        } => {
            run(&scenario, config, catalog)?;
        }
        Commands::FormatTime { seconds } => {
            println!("{}", format_time(seconds));
        }
    }

    Ok(())
}

fn run(
    scenario_path: &Path,
    config_path: Option<PathBuf>,
    catalog_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = PlayerConfig::load(config_path.as_deref())?;
    let catalog = catalog_path
        .as_deref()
        .map(SourceCatalog::from_file)
        .transpose()?;
    let scenario = Scenario::from_file(scenario_path)?;

    tracing::info!("Replaying scenario {}", scenario_path.display());

    for record in scenario::run(&scenario, config, catalog.as_ref()) {
        println!("{}", serde_json::to_string(&record)?);
    }

    Ok(())
}
