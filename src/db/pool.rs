//! SQLite connection wrapper. One connection per process/request; the
//! active-session invariants live in the schema, not here.

use rusqlite::{Connection, Result};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    pub fn with_timeout(path: &str, busy_timeout_ms: u64) -> Result<Self> {
        let conn = Connection::open(Path::new(path))?;
        Self::configure(conn, busy_timeout_ms)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?, DEFAULT_BUSY_TIMEOUT_MS)
    }

    fn configure(conn: Connection, busy_timeout_ms: u64) -> Result<Self> {
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }
}
