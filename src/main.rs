use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use cli::CommandTemplate;
use session::FileStore;

use crate::config::Config;
use crate::shell::Shell;

mod config;
mod log;
mod player;
mod shell;
mod utils;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Set config file path
    #[arg(short, long)]
    config: Option<String>,
    /// Increase log verbosity, repeatable
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cfg: Config = utils::load("camdeck", args.config)?;
    cfg.validate()?;

    let level = log::level(&cfg.log.level, args.verbose);
    log::set(format!(
        "camdeck={},playback={},camclient={},session={},cli={}",
        level, level, level, level, level
    ));

    warn!("set log level : {}", level);
    debug!("config : {:?}", cfg);

    let client = camclient::Client::new(cfg.api.url.clone(), cfg.api.timeout())?;
    let store = open_store(&cfg.session.path)?;
    let template = CommandTemplate::parse(&cfg.player.command)?;

    let shell = Shell::new(client, store, template, cfg.timeline.query())?;
    shell
        .run(crate::shell::stdin_lines(), utils::shutdown_signal())
        .await?;
    info!("camdeck exit");
    Ok(())
}

/// A corrupted session file is discarded; the user has to log in again.
fn open_store(path: &str) -> Result<FileStore> {
    match FileStore::open(path) {
        Ok(store) => Ok(store),
        Err(e) => {
            warn!("{:#}, starting a new session", e);
            if Path::new(path).exists() {
                std::fs::remove_file(path)
                    .with_context(|| format!("failed to remove session file {}", path))?;
            }
            FileStore::open(path)
        }
    }
}
