//! SQLite-backed symbol store
//!
//! One database file per repository. Writers keep a single transaction open
//! from `connect()` until `commit()`, so a whole indexing pass lands in one
//! commit.

use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::symbol::{Symbol, SymbolKind, SymbolRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("symbol store at {0} is not connected")]
    NotConnected(PathBuf),
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS symbols (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    file_path TEXT NOT NULL,
    start_line INTEGER,
    end_line INTEGER,
    docstring TEXT,
    UNIQUE(file_path, name, start_line)
);

CREATE INDEX IF NOT EXISTS idx_symbol_name ON symbols(name);
"#;

/// Per-repository symbol store
pub struct SymbolStore {
    path: PathBuf,
    conn: Option<Connection>,
}

impl SymbolStore {
    /// Create a handle for the store at `path`. Nothing is opened until
    /// [`connect`](Self::connect).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: None,
        }
    }

    /// Open an existing store for queries only.
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
        })
    }

    /// Create a connected in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self {
            path: PathBuf::from(":memory:"),
            conn: None,
        };
        store.init(conn)?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Open the store for writing, creating the file, its parent directory and
    /// the schema when missing.
    pub fn connect(&mut self) -> Result<(), StoreError> {
        if self.conn.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&self.path)?;
        self.init(conn)?;
        info!("Connected to symbol store: {}", self.path.display());
        Ok(())
    }

    fn init(&mut self, conn: Connection) -> Result<(), StoreError> {
        conn.execute_batch(SCHEMA)?;
        conn.execute_batch("BEGIN")?;
        self.conn = Some(conn);
        Ok(())
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn
            .as_ref()
            .ok_or_else(|| StoreError::NotConnected(self.path.clone()))
    }

    /// Insert a symbol, replacing any row with the same
    /// (file_path, name, start_line).
    pub fn insert_or_replace(&self, symbol: &Symbol, file_path: &str) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            r#"
            INSERT OR REPLACE INTO symbols (name, kind, file_path, start_line, end_line, docstring)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )?;

        stmt.execute(params![
            symbol.name,
            symbol.kind.as_str(),
            file_path,
            symbol.start_line as i64,
            symbol.end_line as i64,
            Option::<String>::None,
        ])?;

        Ok(())
    }

    /// Delete every symbol recorded for `file_path`. Returns the number of
    /// rows removed.
    pub fn clear_symbols_for_file(&self, file_path: &str) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM symbols WHERE file_path = ?1", params![file_path])?;
        Ok(removed)
    }

    /// Commit pending writes. Later writes go into a fresh transaction.
    pub fn commit(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
            conn.execute_batch("BEGIN")?;
        }
        Ok(())
    }

    /// Release the connection. Uncommitted writes are rolled back.
    ///
    /// Safe to call on a store that never connected, and more than once.
    pub fn close(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };

        if !conn.is_autocommit() {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                warn!("Failed to roll back {}: {}", self.path.display(), e);
            }
        }

        match conn.close() {
            Ok(()) => debug!("Symbol store closed: {}", self.path.display()),
            Err((_, e)) => warn!("Failed to close {}: {}", self.path.display(), e),
        }
    }

    /// Substring search on `name`, optionally restricted to one kind, in row
    /// order.
    pub fn search(
        &self,
        name: &str,
        kind: Option<SymbolKind>,
        limit: usize,
    ) -> Result<Vec<SymbolRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT name, kind, file_path, start_line, end_line, docstring
            FROM symbols
            WHERE name LIKE ?1 ESCAPE '\'
              AND (?2 IS NULL OR kind = ?2)
            ORDER BY id
            LIMIT ?3
            "#,
        )?;

        let pattern = format!("%{}%", escape_like(name));
        let records = stmt
            .query_map(
                params![pattern, kind.map(|k| k.as_str()), limit as i64],
                row_to_record,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn symbol_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM symbols", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of distinct files that have at least one symbol.
    pub fn file_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn()?.query_row(
            "SELECT COUNT(DISTINCT file_path) FROM symbols",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Distinct file paths that have at least one symbol.
    pub fn indexed_files(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT file_path FROM symbols ORDER BY file_path")?;
        let files = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(files)
    }
}

impl Drop for SymbolStore {
    fn drop(&mut self) {
        self.close();
    }
}

fn row_to_record(row: &Row) -> rusqlite::Result<SymbolRecord> {
    let start_line: Option<i64> = row.get(3)?;
    let end_line: Option<i64> = row.get(4)?;

    Ok(SymbolRecord {
        name: row.get(0)?,
        kind: row.get(1)?,
        file_path: row.get(2)?,
        start_line: start_line.unwrap_or(0) as usize,
        end_line: end_line.unwrap_or(0) as usize,
        docstring: row.get(5)?,
    })
}

/// Escape LIKE wildcards so the query is matched literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
