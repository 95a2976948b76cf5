//! Identity Repository
//!
//! SQLite cache for the session identity. The table never holds more
//! than one row: every write purges existing rows in the same
//! transaction before inserting.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Identity};
use super::db::db_err;
use super::traits::CacheRepository;

/// SQLite implementation of the identity cache
pub struct IdentityRepository {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl IdentityRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheRepository<Identity> for IdentityRepository {
    async fn replace_all(&self, entities: &[Identity]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction().map_err(db_err)?;
        tx.execute("DELETE FROM identities", []).map_err(db_err)?;
        for identity in entities {
            tx.execute(
                "INSERT INTO identities (id, name, email, phone, token) VALUES (?, ?, ?, ?, ?)",
                params![
                    identity.id,
                    identity.name,
                    identity.email,
                    identity.phone,
                    identity.token
                ],
            )
            .map_err(db_err)?;
        }
        tx.commit().map_err(db_err)
    }

    async fn upsert(&self, entity: &Identity) -> DomainResult<()> {
        // A single session row at most: upsert is purge-then-insert
        self.replace_all(std::slice::from_ref(entity)).await
    }

    async fn list(&self) -> DomainResult<Vec<Identity>> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn
            .prepare("SELECT id, name, email, phone, token FROM identities")
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut identities = Vec::new();
        while let Ok(Some(row)) = rows.next() {
            identities.push(row_to_identity(row)?);
        }
        Ok(identities)
    }

    async fn clear(&self) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        conn.execute("DELETE FROM identities", []).map_err(db_err)?;
        Ok(())
    }
}

/// Convert a database row to Identity
fn row_to_identity(row: &rusqlite::Row) -> DomainResult<Identity> {
    Ok(Identity {
        id: row.get(0).map_err(db_err)?,
        name: row.get(1).map_err(db_err)?,
        email: row.get(2).map_err(db_err)?,
        phone: row.get::<_, Option<String>>(3).unwrap_or(None).unwrap_or_default(),
        token: row.get(4).map_err(db_err)?,
    })
}
