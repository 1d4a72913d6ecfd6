//! SQLite-backed fun-fact document store
//!
//! One row per state code in the `states` table; the `funfacts` column holds
//! the list as a JSON array. The connection is shared behind a mutex and every
//! call runs on tokio's blocking pool.
//!
//! Mutations run inside a single `BEGIN IMMEDIATE` transaction that reads the
//! current document, applies the change and upserts the result, so concurrent
//! appends can never create two documents for one state and concurrent
//! replace/delete calls on the same state cannot lose each other's writes.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use states_core::{FunFactEntry, FunFactMutation, StateRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS states (
    statecode TEXT PRIMARY KEY NOT NULL,
    funfacts  TEXT NOT NULL DEFAULT '[]'
);
";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt fun facts document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store task failed: {0}")]
    Join(String),

    #[error("Store connection lock poisoned")]
    Poisoned,

    /// The mutation was refused by the fun-fact rules; nothing was written.
    #[error(transparent)]
    Rejected(states_core::Error),
}

#[derive(Clone)]
pub struct FunFactStore {
    conn: Arc<Mutex<Connection>>,
}

impl FunFactStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Join(e.to_string()))?
    }

    /// Fetch the document for a canonical state code.
    pub async fn find(&self, code: &str) -> Result<Option<FunFactEntry>, StoreError> {
        let code = code.to_string();
        self.with_conn(move |conn| load(conn, &code)).await
    }

    /// Apply a mutation to the state's document atomically and return what was
    /// persisted.
    pub async fn apply(
        &self,
        record: &StateRecord,
        mutation: FunFactMutation,
    ) -> Result<FunFactEntry, StoreError> {
        let record = record.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let existing = load(&tx, &record.code)?;
            let entry = mutation
                .apply(&record, existing)
                .map_err(StoreError::Rejected)?;
            save(&tx, &entry)?;
            tx.commit()?;
            Ok(entry)
        })
        .await
    }

    /// Number of stored documents, including emptied ones.
    pub async fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM states", [], |row| row.get(0))?;
            Ok(usize::try_from(count).unwrap_or_default())
        })
        .await
    }
}

fn load(conn: &Connection, code: &str) -> Result<Option<FunFactEntry>, StoreError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT funfacts FROM states WHERE statecode = ?1",
            params![code],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|json| {
        let funfacts: Vec<String> = serde_json::from_str(&json)?;
        Ok(FunFactEntry::new(code, funfacts))
    })
    .transpose()
}

fn save(conn: &Connection, entry: &FunFactEntry) -> Result<(), StoreError> {
    let json = serde_json::to_string(&entry.funfacts)?;
    conn.execute(
        "INSERT INTO states (statecode, funfacts) VALUES (?1, ?2)
         ON CONFLICT(statecode) DO UPDATE SET funfacts = excluded.funfacts",
        params![entry.state_code, json],
    )?;
    Ok(())
}
