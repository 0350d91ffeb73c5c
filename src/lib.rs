//! rTimeTrack library root.
//! Exposes the CLI parser, the request router, the high-level run()
//! function and the internal modules.

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod logging;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let json = cli.json;

    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::ClockIn { .. } | Commands::ClockOut { .. } => {
            commands::clock::handle(&cli.command, cfg, json)
        }
        Commands::Break { action } => commands::breaks::handle(action, cfg, json),
        Commands::Idle { action } => commands::idle::handle(action, cfg, json),
        Commands::Activity { action } => commands::activity::handle(action, cfg, json),
        Commands::Status { .. } => commands::status::handle(&cli.command, cfg, json),
        Commands::Summary { .. } => commands::summary::handle(&cli.command, cfg, json),
        Commands::Sessions { .. } => commands::sessions::handle(&cli.command, cfg, json),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Api { .. } => commands::api::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    logging::init_logging();

    let cli = Cli::parse();

    // config is loaded once; --db wins over the file
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    tracing::debug!(database = %cfg.database, "configuration loaded");

    dispatch(&cli, &cfg)
}
