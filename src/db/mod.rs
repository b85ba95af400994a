mod schema;
pub mod albums;
pub mod photos;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub use albums::Album;
pub use photos::{NewPhoto, Photo};
pub use schema::{MIGRATIONS, SCHEMA};

/// Storage format for every timestamp column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Connection handle shared between request handlers and scan workers.
pub type SharedDb = Arc<Mutex<Database>>;

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.run_migrations();
        Ok(())
    }

    fn run_migrations(&self) {
        for migration in MIGRATIONS {
            if let Err(e) = self.conn.execute(migration, []) {
                tracing::debug!(error = %e, migration, "Migration skipped");
            }
        }
    }

    pub fn health_check(&self) -> bool {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .is_ok()
    }

    pub fn into_shared(self) -> SharedDb {
        Arc::new(Mutex::new(self))
    }
}

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Unparseable stored values read back as `None` rather than failing the row.
pub(crate) fn parse_timestamp(value: Option<String>) -> Option<NaiveDateTime> {
    value.and_then(|s| NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT).ok())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn memory_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize().unwrap();
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_initialize_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("catalog.db");

        let db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        db.initialize().unwrap();
        assert!(db.health_check());
        assert!(path.exists());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let ts = NaiveDateTime::parse_from_str("2024-07-14 09:30:05", "%Y-%m-%d %H:%M:%S").unwrap();
        let stored = format_timestamp(&ts);
        assert_eq!(stored, "2024-07-14T09:30:05");
        assert_eq!(parse_timestamp(Some(stored)), Some(ts));
        assert_eq!(parse_timestamp(Some("garbage".into())), None);
        assert_eq!(parse_timestamp(None), None);
    }
}
