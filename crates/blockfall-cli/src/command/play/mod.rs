use std::time::{Duration, Instant};

use anyhow::Context as _;
use blockfall_engine::GameConfig;
use ratatui_runtime::Runtime;

use self::app::PlayApp;

mod app;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the shape sequence; random when omitted
    #[clap(long)]
    pub(super) seed: Option<u64>,
    /// Treat a key as released after this many milliseconds without a key event
    ///
    /// Defaults to 150 on terminals that do not report key releases.
    #[clap(long)]
    pub(super) release_timeout_ms: Option<u64>,
}

pub(crate) fn run(config: &GameConfig, arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        seed,
        release_timeout_ms,
    } = arg;

    let mut app = PlayApp::new(
        config,
        *seed,
        release_timeout_ms.map(Duration::from_millis),
        Instant::now(),
    );
    Runtime::new()
        .run(&mut app)
        .context("Failed to run the terminal UI")?;

    let session = app.session();
    let stats = session.stats();
    eprintln!(
        "Game ended ({state:?}): {pieces} pieces locked, {lines} lines cleared",
        state = session.state(),
        pieces = stats.locked_pieces(),
        lines = stats.cleared_lines(),
    );
    Ok(())
}
