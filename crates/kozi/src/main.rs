//! Terminal chat client for the Kozi assistant.

use anyhow::Context;
use clap::Parser;
use kozi::config::KoziConfig;
use kozi::core::{ChatbotBuilder, storage_from_config};
use kozi_tui::{EventBus, TuiConfig};
use log::{debug, info};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the chat client.
#[derive(Parser)]
#[command(name = "kozi", version)]
struct Cli {
    /// Optional path to a kozi.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible reply selection
    #[arg(long)]
    seed: Option<u64>,
    /// Restore the previous session's transcript instead of starting fresh
    #[arg(long)]
    restore: bool,
    /// Display name for the user
    #[arg(long)]
    user: Option<String>,
}

/// Entry point for the Kozi chat client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    kozi::init_logging();

    let cli = Cli::parse();
    info!(
        "starting kozi (config_set={}, seed_set={}, restore={})",
        cli.config.is_some(),
        cli.seed.is_some(),
        cli.restore
    );
    let mut config = if let Some(path) = cli.config.as_ref() {
        info!("loading config from path: {}", path.display());
        KoziConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("cwd")?;
        info!("loading layered config from cwd: {}", cwd.display());
        let layered = KoziConfig::load_layered(&cwd).context("failed to load layered config")?;
        debug!("layered config loaded (layers={})", layered.layers.len());
        layered.config
    };
    if let Some(seed) = cli.seed {
        config.responder.seed = Some(seed);
    }
    let restore = cli.restore || config.storage.restore_on_start;

    let storage = storage_from_config(&config.storage).context("failed to open storage")?;
    let events = EventBus::new(256);
    let chatbot = ChatbotBuilder::from_config(&config, storage)
        .context("failed to build chatbot")?
        .events(Arc::new(events.clone()))
        .build();
    let chatbot = Arc::new(chatbot);
    let init = chatbot.initialize(restore);
    info!("chat session ready (mode={:?})", init);

    kozi_tui::run(
        chatbot,
        events,
        TuiConfig {
            user_name: cli.user,
        },
    )
    .await
}
