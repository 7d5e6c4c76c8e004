use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{Result, WikiracerError};

pub mod migrate;

/// SQLite handle for the article store. Every call opens its own
/// connection on the blocking pool.
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

/// Pragmas applied to every connection. The store is read-heavy during a
/// search, so WAL plus a large page cache and mmap.
fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL; \
         PRAGMA synchronous = NORMAL; \
         PRAGMA temp_store = MEMORY; \
         PRAGMA cache_size = -65536; \
         PRAGMA mmap_size = 268435456; \
         PRAGMA busy_timeout = 5000;",
    )?;
    Ok(())
}

impl Db {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a configured connection on the current thread
    pub fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        configure(&conn)?;
        Ok(conn)
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        task::spawn_blocking(move || {
            let mut conn = db.open_connection()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| WikiracerError::Fetch(format!("database task failed: {}", e)))?
    }
}
