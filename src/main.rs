//! hyperlaunch binary: wires the session controller to the stdio frontend,
//! the unified search provider, and the system launcher.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

use hyperlaunch::config::Config;
use hyperlaunch::executor::SystemLauncher;
use hyperlaunch::frontend::{self, StdioFrontend};
use hyperlaunch::logging;
use hyperlaunch::provider::UnifiedSearchProvider;
use hyperlaunch::session::Session;
use hyperlaunch::traits::{PresentationSink, WindowControl};

#[derive(Parser, Debug)]
#[command(
    name = "hyperlaunch",
    about = "Quick-launch session controller speaking JSONL over stdio",
    version
)]
struct Args {
    /// Config file path (default: <config_dir>/hyperlaunch/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter override, e.g. "debug" or "hyperlaunch=trace"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = logging::init(args.log_level.as_deref());

    let config = match args.config.as_deref() {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load_default(),
    };
    info!(
        debounce_ms = config.debounce_ms,
        search_root = %config.search_root().display(),
        "starting hyperlaunch session"
    );

    let frontend = Arc::new(StdioFrontend::new());
    let provider = Arc::new(UnifiedSearchProvider::new(&config));
    let executor = Arc::new(SystemLauncher::new());

    let (tx, rx) = mpsc::unbounded_channel();
    frontend::spawn_stdin_reader(tx.clone());

    let session = Session::new(
        config,
        provider,
        executor,
        frontend.clone() as Arc<dyn WindowControl>,
        frontend as Arc<dyn PresentationSink>,
        tx,
        rx,
    );
    session.run().await;
    info!("hyperlaunch exiting");
    Ok(())
}
