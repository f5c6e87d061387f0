use anyhow::Result;
use clap::{Parser, Subcommand};
use emissions_etl::{
    history::{Gate, StateKey, StateStore},
    pipeline, Settings,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Incremental emissions ETL")]
struct Cli {
    /// YAML file overriding the default paths and URLs.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch new sources and run every stage whose inputs changed (default).
    Run {
        /// Skip discovery and downloads.
        #[arg(long)]
        offline: bool,
        /// Run every stage regardless of recorded checksums.
        #[arg(long)]
        force: bool,
    },
    /// Create an empty state file.
    Init,
    /// Print the state file.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,emissions_etl=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) settings ─────────────────────────────────────────────────
    let cli = Cli::parse();
    let settings = Settings::load(cli.settings.as_deref())?;
    info!(state = %settings.state_file.display(), "startup");

    match cli.command.unwrap_or(Command::Run {
        offline: false,
        force: false,
    }) {
        Command::Run { offline, force } => {
            let report = pipeline::run(settings, offline, force).await?;
            let processed = report
                .stages
                .iter()
                .filter(|(_, g)| *g == Gate::Processed)
                .count();
            info!(fetch = ?report.fetch, processed, skipped = report.stages.len() - processed, "run complete");
        }
        Command::Init => {
            let store = StateStore::create(&settings.state_file, &StateKey::ALL)?;
            info!(path = %store.path().display(), "created state file");
        }
        Command::Status => {
            let store = StateStore::open(&settings.state_file)?;
            for (key, value) in store.entries() {
                println!("{}={}", key, value);
            }
        }
    }

    info!("all done");
    Ok(())
}
