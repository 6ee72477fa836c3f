mod cli;
mod cli_utils;
mod commands;
mod shutdown;
mod view;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (warn unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ranking_cli=warn,ranking_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli_utils::load_config(&args);

    match args.command {
        Some(Command::Watch { game, legacy }) => commands::watch::run(&config, game, legacy),
        Some(Command::Export {
            game,
            password,
            output_dir,
            wait_secs,
            legacy,
        }) => commands::export::run(
            &config,
            game,
            &password,
            output_dir.as_deref(),
            wait_secs,
            legacy,
        ),
        Some(Command::Status) => commands::status::run(&config),
        Some(Command::Games) => commands::games::run(&config),
        None => commands::watch::run(&config, None, false),
    }
}
