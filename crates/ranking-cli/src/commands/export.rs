//! Export command: wait for the live ranking, then write it to a file.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use ranking_core::{
    Config, DirectorySink, Error, GameType, LiveRankingController, RankingExporter, RankingStatus,
};

use crate::cli_utils;

pub fn run(
    config: &Config,
    game: Option<GameType>,
    password: &str,
    output_dir: Option<&Path>,
    wait_secs: u64,
    legacy: bool,
) -> Result<()> {
    let exporter = RankingExporter::new(config.export.secret.clone());

    // Fail fast before touching the network.
    if !exporter.authorize(password) {
        bail!("Wrong password");
    }

    let store = cli_utils::open_store(config)?;
    let path = cli_utils::resolve_path(config, game, legacy);
    let controller = LiveRankingController::new(store);

    eprintln!("Loading ranking from {}...", path);
    controller.start(path);

    let deadline = Instant::now() + Duration::from_secs(wait_secs);
    let ranking = loop {
        match controller.status() {
            RankingStatus::Ready { ranking, .. } => break ranking,
            RankingStatus::Failed { message, .. } => bail!("Could not load ranking: {}", message),
            _ if Instant::now() >= deadline => {
                bail!("Timed out after {}s waiting for the ranking", wait_secs)
            }
            _ => std::thread::sleep(Duration::from_millis(50)),
        }
    };
    controller.stop();

    let output_dir = output_dir.unwrap_or(config.export.output_dir.as_path());
    let mut sink = DirectorySink::new(output_dir);

    match exporter.export_today(password, path, &ranking, &mut sink) {
        Ok(name) => {
            println!(
                "Exported {} entries to {}",
                ranking.len(),
                output_dir.join(name).display()
            );
            Ok(())
        }
        Err(Error::Unauthorized) => bail!("Wrong password"),
        Err(e) => Err(e.into()),
    }
}
