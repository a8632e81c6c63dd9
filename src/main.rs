use std::error::Error;

use clap::Parser;
use stm::cli::commands::Cli;
use stm::io::config_io::read_config;
use stm::io::{logging, paths};
use stm::store::Store;
use stm::tui::theme::Theme;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config_path = cli.config.clone().unwrap_or_else(paths::default_config_path);
    let config = read_config(&config_path)?;

    let level = logging::resolve_level(
        std::env::var(logging::LOG_ENV).ok(),
        cli.log_level.as_deref(),
        config.log.level.as_deref(),
    );
    let log_path = paths::log_path();
    logging::init(&log_path, &level)
        .map_err(|e| format!("could not open log file {}: {}", log_path.display(), e))?;

    let db_path = cli
        .db
        .or_else(|| config.storage.database.clone())
        .unwrap_or_else(paths::default_db_path);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        db = %db_path.display(),
        config = %config_path.display(),
        "starting"
    );
    let store = Store::open(&db_path)?;
    let theme = Theme::from_config(&config.ui);

    stm::tui::run(store, theme)
}
