use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::users::UserStore;

/// Database file used when no other path is configured
pub const DEFAULT_DB_PATH: &str = "mydatabase.db";

/// SQLite configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Path to the SQLite database file
    pub db_path: String,
    /// Schema definition for the database
    pub schema: Schema,
}

impl SqliteConfig {
    /// Create a new SQLite config with path and schema
    pub fn new(db_path: impl Into<String>, schema: Schema) -> Self {
        Self {
            db_path: db_path.into(),
            schema,
        }
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH, Schema::users())
    }
}

/// A single SQLite connection shared by every operation.
///
/// The connection is opened once and closed when the `Database` is dropped.
/// Callers borrow it; nothing reopens the file between operations.
pub struct Database {
    conn: Connection,
    schema: Schema,
}

impl Database {
    /// Open (creating if absent) the file named in `config`
    pub fn open(config: &SqliteConfig) -> Result<Self> {
        info!("opening sqlite database at path: {}", config.db_path);
        let conn = Connection::open(&config.db_path).map_err(|source| Error::Open {
            path: config.db_path.clone(),
            source,
        })?;
        Ok(Self {
            conn,
            schema: config.schema.clone(),
        })
    }

    pub fn open_in_memory(schema: Schema) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::Open {
            path: ":memory:".to_string(),
            source,
        })?;
        Ok(Self { conn, schema })
    }

    /// Create every configured table that is not already present.
    /// Safe to call on every startup.
    pub fn initialize_schema(&self) -> Result<()> {
        for sql in self.schema.statements() {
            debug!(%sql, "executing schema statement");
            self.conn.execute(&sql, [])?;
        }
        Ok(())
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Row operations on the users table
    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
