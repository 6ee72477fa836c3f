use anyhow::Result;
use ranking_core::{Config, GameType};

pub fn run(config: &Config) -> Result<()> {
    for game in GameType::all() {
        let marker = if game == config.default_game { " (default)" } else { "" };
        println!("{}  {}{}", game, config.record_path(game), marker);
    }
    Ok(())
}
