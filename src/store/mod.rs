//! SQLite persistence for projects, tasks, tags, comments and settings.
//!
//! `Store` is a thin synchronous wrapper around one `rusqlite::Connection`.
//! The TUI never calls it directly; requests go through the worker thread in
//! `tui::worker`, which owns the store.

mod comments;
mod migrations;
mod projects;
mod settings;
mod tags;
mod tasks;

use std::path::{Path, PathBuf};

use rusqlite::Connection;

pub use migrations::schema_version;
pub use settings::LAST_PROJECT_KEY;
pub use tags::TagSync;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the task database
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at `path` and bring its schema up to date.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::init(conn)
    }

    /// Fresh in-memory database, used by tests
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> StoreResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::run(&mut conn)?;
        Ok(Store { conn })
    }
}

/// Escape `%`, `_` and the escape char itself for a `LIKE ... ESCAPE '\'` pattern
pub(crate) fn like_pattern(search: &str) -> String {
    let mut out = String::with_capacity(search.len() + 2);
    out.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
