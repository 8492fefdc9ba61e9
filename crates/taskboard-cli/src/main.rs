mod cli;
mod config;
mod storage;
mod tasks;
mod tui;

use crate::cli::ConfigCommand;
use clap::Parser;
use color_eyre::Result;
use taskboard_core::storage::KvStore;
use taskboard_task::Board;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point wiring the CLI to the board UI and task commands.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = cli::Cli::parse();
    let config = config::load()?;
    init_tracing(&config);

    match cli.command.unwrap_or(cli::Command::Tui) {
        cli::Command::Tui => {
            let store = storage::store_from_config(&config)?;
            let mut board = Board::open(store, config.view_config()).await;
            tui::launch(&mut board).await?
        }
        cli::Command::Version => print_version(),
        cli::Command::Health => run_health_check(&config).await?,
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
        cli::Command::Task(cmd) => tasks::handle(cmd, &config).await?,
    }

    Ok(())
}

fn init_tracing(config: &config::Config) {
    // RUST_LOG wins; otherwise the configured level. Logs go to stderr so they
    // never mix with command output.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("taskboard {}", env!("CARGO_PKG_VERSION"));
}

/// Runs a quick round-trip against the configured storage directory.
async fn run_health_check(config: &config::Config) -> Result<()> {
    let store = storage::store_from_config(config)?;
    run_store_health(&store).await?;
    println!("Storage: ok ({})", store.root().display());
    Ok(())
}

async fn run_store_health<S: KvStore>(store: &S) -> Result<()> {
    let probe_key = "health/probe";
    let payload = b"ok";
    store
        .put(probe_key, payload)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    let round_trip = store
        .get(probe_key)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;
    store
        .delete(probe_key)
        .await
        .map_err(|e| color_eyre::eyre::eyre!(e.to_string()))?;

    if round_trip != payload {
        color_eyre::eyre::bail!("storage round-trip failed");
    }
    Ok(())
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}
