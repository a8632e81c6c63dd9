use std::path::PathBuf;

const APP_DIR: &str = "stm";

/// Directory holding config.toml, respecting XDG_CONFIG_HOME
pub fn config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// Directory holding the database and log file, respecting XDG_DATA_HOME
pub fn data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_db_path() -> PathBuf {
    data_dir().join("stm.db")
}

pub fn log_path() -> PathBuf {
    data_dir().join("stm.log")
}

fn xdg_dir(var: &str, home_fallback: &str) -> PathBuf {
    resolve_dir(std::env::var(var).ok(), std::env::var("HOME").ok(), home_fallback)
}

/// An empty or relative XDG value is ignored
fn resolve_dir(xdg: Option<String>, home: Option<String>, home_fallback: &str) -> PathBuf {
    let base = match xdg.map(PathBuf::from) {
        Some(dir) if dir.is_absolute() => dir,
        _ => home
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/"))
            .join(home_fallback),
    };
    base.join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_value_wins() {
        let dir = resolve_dir(Some("/xdg/data".into()), Some("/home/u".into()), ".local/share");
        assert_eq!(dir, PathBuf::from("/xdg/data/stm"));
    }

    #[test]
    fn falls_back_to_home() {
        let dir = resolve_dir(None, Some("/home/u".into()), ".config");
        assert_eq!(dir, PathBuf::from("/home/u/.config/stm"));
    }

    #[test]
    fn relative_or_empty_xdg_is_ignored() {
        let home = Some("/home/u".to_string());
        assert_eq!(
            resolve_dir(Some(String::new()), home.clone(), ".config"),
            PathBuf::from("/home/u/.config/stm")
        );
        assert_eq!(
            resolve_dir(Some("rel/dir".into()), home, ".config"),
            PathBuf::from("/home/u/.config/stm")
        );
    }
}
