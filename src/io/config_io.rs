use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Error type for config file IO
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read the config file. A missing file yields the defaults; a malformed one
/// is an error rather than being silently ignored.
pub fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(AppConfig::default()),
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(&tmp.path().join("config.toml")).unwrap();
        assert!(config.storage.database.is_none());
        assert!(config.log.level.is_none());
        assert!(config.ui.colors.is_empty());
    }

    #[test]
    fn reads_all_sections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r##"[storage]
database = "/tmp/tasks.db"

[log]
level = "debug"

[ui.colors]
highlight = "#ff0000"
"##,
        )
        .unwrap();

        let config = read_config(&path).unwrap();
        assert_eq!(config.storage.database, Some(PathBuf::from("/tmp/tasks.db")));
        assert_eq!(config.log.level.as_deref(), Some("debug"));
        assert_eq!(config.ui.colors.get("highlight").map(String::as_str), Some("#ff0000"));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[log]\nlevel = \"warn\"\n").unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.log.level.as_deref(), Some("warn"));
        assert!(config.storage.database.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[storage\ndatabase = ").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
