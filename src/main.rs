//! tutorial-blocks - custom block behaviours replayed headlessly
//!
//! Registers the tutorial blocks, then replays a scripted scenario against
//! them tick by tick, optionally writing session events to a JSONL log.

mod config;
mod plugin;
mod scenario;

use anyhow::Result;
use clap::Parser;
use config::{PluginConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use plugin::TutorialPlugin;
use scenario::{ScenarioFile, ScenarioRunner};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tutorial_testkit::JsonlSink;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay tutorial block scenarios headlessly", long_about = None)]
struct Args {
    /// Plugin configuration (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Scenario to replay (JSON)
    #[arg(long)]
    scenario: PathBuf,

    /// Write session events to this JSONL file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Save the effective configuration back to the --config path
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over the config's filter; config problems are reported once logging is up.
    let loaded = PluginConfig::read(&args.config);
    let fallback_filter = loaded
        .as_ref()
        .map(|cfg| cfg.log_filter.clone())
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter)),
        )
        .init();

    info!("Starting tutorial-blocks v{}", env!("CARGO_PKG_VERSION"));
    let config = match loaded {
        Ok(cfg) => cfg,
        Err(err) => PluginConfig::fallback(&args.config, &err),
    };
    persist_config(&args, &config)?;

    let scenario = ScenarioFile::from_path(&args.scenario)?;
    let sink = args.events.as_ref().map(JsonlSink::create).transpose()?;

    let mut plugin = TutorialPlugin::setup(&config)?;
    plugin.start();
    let result = ScenarioRunner::new(&plugin, sink).and_then(|runner| runner.run(&scenario));
    plugin.shutdown();

    let (summary, notices) = result?;
    for delivered in notices.delivered() {
        info!(viewer = %delivered.viewer, "{}", delivered.notice);
    }
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => warn!(%err, "failed to render summary"),
    }
    if let Some(path) = &args.events {
        info!(path = %path.display(), "wrote session events");
    }
    Ok(())
}

fn persist_config(args: &Args, config: &PluginConfig) -> Result<()> {
    if args.write_config {
        config.save_to_path(&args.config)?;
        info!(path = %args.config.display(), "wrote plugin config");
    }
    Ok(())
}
