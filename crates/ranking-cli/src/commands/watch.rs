//! Live ranking display.

use std::io::{Write, stdout};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use ranking_core::{Config, GameType, LiveRankingController, RankingStatus};
use tracing::debug;

use crate::cli_utils;
use crate::shutdown;
use crate::view;

/// Run the watch command until Ctrl+C
pub fn run(config: &Config, game: Option<GameType>, legacy: bool) -> Result<()> {
    let shutdown = shutdown::install()?;
    let store = cli_utils::open_store(config)?;
    let path = cli_utils::resolve_path(config, game, legacy);

    let (changed_tx, changed_rx) = mpsc::channel::<()>();
    let controller = LiveRankingController::with_observer(
        store,
        Box::new(move |status: &RankingStatus| {
            debug!("Status changed: {}", status.label());
            let _ = changed_tx.send(());
        }),
    );

    controller.start(path);
    redraw(&controller.status())?;

    while !shutdown.is_shutdown() {
        match changed_rx.recv_timeout(Duration::from_millis(200)) {
            Ok(()) => {
                // coalesce bursts into one redraw
                while changed_rx.try_recv().is_ok() {}
                redraw(&controller.status())?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    controller.stop();
    println!("Stopped.");
    Ok(())
}

fn redraw(status: &RankingStatus) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    write!(out, "{}", view::render_status(status))?;
    writeln!(out, "\nPress Ctrl+C to quit")?;
    out.flush()?;
    Ok(())
}
