use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "stm",
    about = concat!("stm v", env!("CARGO_PKG_VERSION"), " - tasks in your terminal"),
    version
)]
pub struct Cli {
    /// Database file (default: $XDG_DATA_HOME/stm/stm.db)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/stm/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "stm=trace" (STM_LOG overrides it)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}
