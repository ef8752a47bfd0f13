use std::sync::Arc;

use clap::Parser;
use parley_config::{Config, SettingsPatch};
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod cli;
mod controller;
mod events;
mod io;
mod state;

use self::cli::Cli;
use self::controller::AppController;
use self::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = Config::new();
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    let state = Arc::new(AppState::new(config, cli.in_memory)?);

    if cli.clear_cache {
        state.orchestrator.clear_cache()?;
    }

    if let Some(target) = cli.target {
        state
            .orchestrator
            .update_settings(SettingsPatch::target_language(target))?;
    }

    if cli.stats {
        let stats = state.orchestrator.cache_stats();
        println!(
            "entries={} negative={} target={}",
            stats.entries,
            stats.negative,
            state.orchestrator.settings().target_language
        );
        return Ok(());
    }

    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    tokio::select! {
        result = signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("failed to listen for ctrl+c: {e}");
            }
            tracing::info!("Shutdown requested");
            controller.shutdown();
        }
        _ = controller.cancelled() => {
            tracing::info!("Input finished");
        }
    }

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task exited with error: {e}"),
            Err(e) => tracing::error!("task panicked: {e}"),
        }
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
