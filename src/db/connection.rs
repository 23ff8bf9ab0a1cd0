//! Connection lifecycle and schema for the embedded SQLite store.
//!
//! The [`Database`] type is the single owner of the connection handle. It
//! moves from Closed to Open at construction (which includes schema
//! initialization) and back to Closed on [`Database::close`] or drop. Every
//! data operation checks the state first and fails fast on a closed store
//! rather than silently doing nothing.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::{debug, warn};
use rusqlite::Connection;

use crate::error::{Error, Result};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".reading-tracker";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "books.sqlite";

/// All 17 book columns. Column order and nullability match the data files
/// written by earlier versions of the application, so existing libraries
/// keep opening cleanly.
const CREATE_BOOKS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        isbn TEXT,
        page_count INTEGER NOT NULL DEFAULT 0,
        current_page INTEGER NOT NULL DEFAULT 0,
        start_date INTEGER,
        completion_date INTEGER,
        genre TEXT,
        publisher TEXT,
        year_published INTEGER,
        notes TEXT,
        review TEXT,
        rating INTEGER DEFAULT 0,
        cover_path TEXT,
        date_added INTEGER NOT NULL,
        status INTEGER DEFAULT 0
    )";

/// Reading sessions cascade away with their book.
const CREATE_SESSIONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS reading_sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL,
        session_date INTEGER NOT NULL,
        duration_minutes INTEGER NOT NULL,
        pages_read INTEGER NOT NULL,
        start_page INTEGER NOT NULL,
        end_page INTEGER NOT NULL,
        notes TEXT,
        FOREIGN KEY (book_id) REFERENCES books(id) ON DELETE CASCADE
    )";

/// Generic key/value cache reserved for future external-lookup caching
/// (cover art, ISBN metadata). Nothing in the core reads or writes it yet.
const CREATE_CACHE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS api_cache (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cache_key TEXT UNIQUE NOT NULL,
        cache_data TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL
    )";

/// Sole owner of the connection to the embedded SQLite store backing one
/// data file. All CRUD, search, and transaction operations hang off this
/// type; entities flowing in and out carry no reference back to it.
#[derive(Debug)]
pub struct Database {
    /// `None` once the store has been closed. Checked by every operation.
    conn: Option<Connection>,
    /// Whether a transaction is currently open on the connection. Nesting
    /// is rejected rather than handed to the engine.
    pub(super) in_transaction: bool,
}

impl Database {
    /// Open (creating if necessary) the database file at `path`, switch on
    /// foreign-key enforcement, and initialize the schema. Any failure along
    /// the way surfaces as [`Error::StorageUnavailable`] and the store never
    /// reaches the open state.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                Error::StorageUnavailable(format!("failed to create data directory: {err}"))
            })?;
        }

        let conn = Connection::open(path).map_err(|err| {
            Error::StorageUnavailable(format!("failed to open SQLite database: {err}"))
        })?;

        let db = Self::finish_open(conn)?;
        debug!("opened database at {}", path.display());
        Ok(db)
    }

    /// Open the database at its default location beneath the user's home
    /// directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open a throwaway in-memory database. Mostly useful for tests and
    /// demos; the data vanishes when the store is closed.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|err| {
            Error::StorageUnavailable(format!("failed to open in-memory database: {err}"))
        })?;
        Self::finish_open(conn)
    }

    /// Resolve the default path to the SQLite file inside the user's home.
    pub fn default_path() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new().ok_or_else(|| {
            Error::StorageUnavailable("could not locate home directory".to_string())
        })?;
        Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
    }

    /// Shared tail of every `open_*` constructor: pragmas plus schema.
    fn finish_open(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", []).map_err(|err| {
            Error::StorageUnavailable(format!("failed to enable foreign keys: {err}"))
        })?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Some(conn),
            in_transaction: false,
        })
    }

    /// Whether the store is currently open and usable.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the connection. Closing an already-closed store is a no-op,
    /// and dropping the store closes it implicitly, so callers only need
    /// this when they want the file handle gone at a specific point.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.in_transaction = false;
            if let Err((_conn, err)) = conn.close() {
                warn!("error while closing database: {err}");
            } else {
                debug!("closed database connection");
            }
        }
    }

    /// Borrow the live connection, or fail fast when the store is closed.
    /// Every operation in the sibling modules goes through here.
    pub(super) fn conn(&self) -> Result<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| Error::precondition("database is closed"))
    }
}

/// Create the three tables if they are absent. Idempotent, run once per
/// open; a failure here means the store must not be considered open.
fn initialize_schema(conn: &Connection) -> Result<()> {
    for create in [CREATE_BOOKS_TABLE, CREATE_SESSIONS_TABLE, CREATE_CACHE_TABLE] {
        conn.execute(create, []).map_err(|err| {
            Error::StorageUnavailable(format!("failed to initialize schema: {err}"))
        })?;
    }
    debug!("schema initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_the_file_and_missing_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("books.sqlite");
        assert!(!path.parent().unwrap().exists());

        let db = Database::open(&path).unwrap();
        assert!(db.is_open());
        assert!(path.exists());
    }

    #[test]
    fn reopening_an_existing_file_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.sqlite");

        {
            let _db = Database::open(&path).unwrap();
        }
        // Schema creation runs again on the second open without complaint.
        let db = Database::open(&path).unwrap();
        assert!(db.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        db.close();
        assert!(!db.is_open());
        db.close();
        assert!(!db.is_open());
    }

    #[test]
    fn operations_on_a_closed_store_fail_fast() {
        let mut db = Database::open_in_memory().unwrap();
        db.close();
        assert!(matches!(
            db.get_all_books(),
            Err(crate::Error::PreconditionFailed(_))
        ));
    }

    #[test]
    fn schema_contains_the_three_tables() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('books', 'reading_sessions', 'api_cache')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }
}
