//! CLI argument definitions for ranking.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ranking_core::GameType;

#[derive(Parser)]
#[command(name = "ranking")]
#[command(about = "Live game score ranking", version)]
pub struct Args {
    /// Path to config file
    #[arg(short, long, default_value = "ranking.toml")]
    pub config: PathBuf,

    /// Realtime database URL (overrides config)
    #[arg(long, env = "RANKING_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database auth token (overrides config)
    #[arg(long, env = "RANKING_AUTH", hide_env_values = true)]
    pub auth: Option<String>,

    /// Export password expected by the export gate (overrides config)
    #[arg(long, env = "RANKING_EXPORT_SECRET", hide_env_values = true)]
    pub export_secret: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the live ranking, updating as scores arrive
    Watch {
        /// Game to watch (default from config)
        #[arg(short, long)]
        game: Option<GameType>,
        /// Read the flat `usuarios` tree
        #[arg(long)]
        legacy: bool,
    },
    /// Export the current ranking to a `;`-separated file
    Export {
        /// Game to export (default from config)
        #[arg(short, long)]
        game: Option<GameType>,
        /// Export password
        #[arg(short, long)]
        password: String,
        /// Output directory (default from config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Seconds to wait for the first ranking
        #[arg(long, default_value = "30")]
        wait_secs: u64,
        /// Read the flat `usuarios` tree
        #[arg(long)]
        legacy: bool,
    },
    /// Check the connection to the database
    Status,
    /// List selectable games
    Games,
}
