use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides every other log level source
pub const LOG_ENV: &str = "STM_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Pick the filter directive: `STM_LOG`, then the CLI flag, then the config file.
pub fn resolve_level(env: Option<String>, cli: Option<&str>, config: Option<&str>) -> String {
    env.filter(|s| !s.trim().is_empty())
        .or_else(|| cli.map(str::to_string))
        .or_else(|| config.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Send tracing output to `path`. The terminal belongs to the TUI, so nothing
/// is ever written to stdout or stderr.
pub fn init(path: &Path, level: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    // A subscriber may already be installed (tests); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init();
    Ok(())
}
