//! Database Connection and Setup
//!
//! Manages the single shared SQLite container backing every per-domain
//! cache, and its migrations. All tables are caches of remote state
//! (except `identities`, which is written locally on login/logout), so
//! the schema carries no history: it can be rebuilt from a fetch.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared handle to the on-device cache database
#[derive(Clone)]
pub struct DbState {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl DbState {
    /// Connection handle shared with the per-domain repositories
    pub fn handle(&self) -> Arc<Mutex<Option<Connection>>> {
        self.conn.clone()
    }

    /// Drop the connection, flushing SQLite state to disk
    pub async fn close(&self) {
        let mut guard = self.conn.lock().await;
        *guard = None;
    }
}

/// Map a SQLite failure into a domain error
pub(crate) fn db_err(e: rusqlite::Error) -> DomainError {
    DomainError::Internal(e.to_string())
}

/// Open (or create) the cache database and run migrations
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = Connection::open(db_path).map_err(db_err)?;

    run_migrations(&conn)?;

    Ok(DbState {
        conn: Arc::new(Mutex::new(Some(conn))),
    })
}

/// Create the cache tables if they do not exist yet
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS identities (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL DEFAULT '',
            token TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            event_type TEXT NOT NULL DEFAULT 'other',
            location_name TEXT NOT NULL DEFAULT '',
            location_address TEXT NOT NULL DEFAULT '',
            coordinates TEXT,
            date INTEGER NOT NULL,
            organizer_name TEXT NOT NULL DEFAULT '',
            organizer_phone TEXT NOT NULL DEFAULT '',
            organizer_email TEXT NOT NULL DEFAULT '',
            capacity INTEGER NOT NULL DEFAULT 0,
            sold INTEGER NOT NULL DEFAULT 0,
            amenities TEXT NOT NULL DEFAULT '[]',
            requirements TEXT NOT NULL DEFAULT '[]',
            ticket_types TEXT NOT NULL DEFAULT '[]',
            weather TEXT NOT NULL DEFAULT '',
            created_at INTEGER,
            updated_at INTEGER
        );

        CREATE TABLE IF NOT EXISTS outings (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            owner TEXT NOT NULL,
            participants TEXT NOT NULL DEFAULT '[]',
            event_ids TEXT NOT NULL DEFAULT '[]',
            status TEXT NOT NULL DEFAULT 'draft',
            created_at INTEGER,
            updated_at INTEGER
        );

        -- 'references' is a SQL keyword; the column is named refs
        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            outing_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            amount REAL NOT NULL,
            payer TEXT NOT NULL,
            participants TEXT NOT NULL DEFAULT '[]',
            refs TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER,
            updated_at INTEGER
        );
        CREATE INDEX IF NOT EXISTS idx_activities_outing ON activities(outing_id);

        CREATE TABLE IF NOT EXISTS debts (
            id TEXT PRIMARY KEY,
            outing_id TEXT NOT NULL,
            from_user TEXT NOT NULL,
            to_user TEXT NOT NULL,
            amount REAL NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
        );
        CREATE INDEX IF NOT EXISTS idx_debts_outing ON debts(outing_id);

        CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            kind TEXT NOT NULL DEFAULT 'other',
            title TEXT NOT NULL,
            message TEXT NOT NULL DEFAULT '',
            reference_id TEXT NOT NULL DEFAULT '',
            sent_at INTEGER NOT NULL,
            read_at INTEGER
        );",
    )
    .map_err(db_err)
}
