//! Outing Repository
//!
//! SQLite cache for outings. Activities and debts are first-class
//! child tables keyed by outing_id and are rewritten together with
//! their parent: the server's response is the source of truth for the
//! whole aggregate.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{
    Activity, Debt, DebtStatus, DomainError, DomainResult, Outing, OutingStatus,
};
use super::db::db_err;
use super::event_repo::{decode_list, delete_absent};
use super::traits::CacheRepository;

/// SQLite implementation of the outing cache
pub struct OutingRepository {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl OutingRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheRepository<Outing> for OutingRepository {
    async fn replace_all(&self, entities: &[Outing]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction().map_err(db_err)?;
        delete_absent(&tx, "outings", entities.iter().map(|o| o.id.as_str()))?;
        delete_orphaned_children(&tx, entities.iter().map(|o| o.id.as_str()))?;
        for outing in entities {
            write_outing(&tx, outing)?;
        }
        tx.commit().map_err(db_err)
    }

    async fn upsert(&self, entity: &Outing) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction().map_err(db_err)?;
        write_outing(&tx, entity)?;
        tx.commit().map_err(db_err)
    }

    async fn list(&self) -> DomainResult<Vec<Outing>> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, owner, participants, event_ids, status,
                        created_at, updated_at
                 FROM outings ORDER BY created_at ASC, id ASC",
            )
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut outings = Vec::new();
        while let Ok(Some(row)) = rows.next() {
            outings.push(row_to_outing(row)?);
        }
        drop(rows);
        drop(stmt);

        for outing in &mut outings {
            outing.activities = load_activities(conn, &outing.id)?;
            outing.debts = load_debts(conn, &outing.id)?;
        }
        Ok(outings)
    }

    async fn clear(&self) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction().map_err(db_err)?;
        tx.execute("DELETE FROM activities", []).map_err(db_err)?;
        tx.execute("DELETE FROM debts", []).map_err(db_err)?;
        tx.execute("DELETE FROM outings", []).map_err(db_err)?;
        tx.commit().map_err(db_err)
    }
}

/// Remove child rows whose parent outing is gone from the new fetch
fn delete_orphaned_children<'a>(
    conn: &Connection,
    keep: impl Iterator<Item = &'a str>,
) -> DomainResult<()> {
    let ids: Vec<&str> = keep.collect();
    for table in ["activities", "debts"] {
        if ids.is_empty() {
            conn.execute(&format!("DELETE FROM {}", table), [])
                .map_err(db_err)?;
        } else {
            let placeholders = vec!["?"; ids.len()].join(", ");
            conn.execute(
                &format!(
                    "DELETE FROM {} WHERE outing_id NOT IN ({})",
                    table, placeholders
                ),
                rusqlite::params_from_iter(ids.iter()),
            )
            .map_err(db_err)?;
        }
    }
    Ok(())
}

/// Upsert one outing row and rewrite its child rows
fn write_outing(conn: &Connection, outing: &Outing) -> DomainResult<()> {
    let participants = serde_json::to_string(&outing.participants)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let event_ids = serde_json::to_string(&outing.event_ids)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO outings (id, title, description, owner, participants, event_ids,
                              status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             description = excluded.description,
             owner = excluded.owner,
             participants = excluded.participants,
             event_ids = excluded.event_ids,
             status = excluded.status,
             created_at = excluded.created_at,
             updated_at = excluded.updated_at",
        params![
            outing.id,
            outing.title,
            outing.description,
            outing.owner,
            participants,
            event_ids,
            outing.status.as_str(),
            outing.created_at,
            outing.updated_at
        ],
    )
    .map_err(db_err)?;

    conn.execute("DELETE FROM activities WHERE outing_id = ?", params![outing.id])
        .map_err(db_err)?;
    for activity in &outing.activities {
        let participants = serde_json::to_string(&activity.participants)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let refs = serde_json::to_string(&activity.references)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        conn.execute(
            "INSERT INTO activities (id, outing_id, title, description, amount, payer,
                                     participants, refs, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                activity.id,
                outing.id,
                activity.title,
                activity.description,
                activity.amount,
                activity.payer,
                participants,
                refs,
                activity.created_at,
                activity.updated_at
            ],
        )
        .map_err(db_err)?;
    }

    conn.execute("DELETE FROM debts WHERE outing_id = ?", params![outing.id])
        .map_err(db_err)?;
    for debt in &outing.debts {
        conn.execute(
            "INSERT INTO debts (id, outing_id, from_user, to_user, amount, status)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                debt.id,
                outing.id,
                debt.from_user,
                debt.to_user,
                debt.amount,
                debt.status.as_str()
            ],
        )
        .map_err(db_err)?;
    }
    Ok(())
}

fn load_activities(conn: &Connection, outing_id: &str) -> DomainResult<Vec<Activity>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, outing_id, title, description, amount, payer, participants, refs,
                    created_at, updated_at
             FROM activities WHERE outing_id = ? ORDER BY created_at ASC, id ASC",
        )
        .map_err(db_err)?;
    let mut rows = stmt.query(params![outing_id]).map_err(db_err)?;

    let mut activities = Vec::new();
    while let Ok(Some(row)) = rows.next() {
        activities.push(Activity {
            id: row.get(0).map_err(db_err)?,
            outing_id: row.get(1).map_err(db_err)?,
            title: row.get(2).map_err(db_err)?,
            description: row.get::<_, Option<String>>(3).unwrap_or(None).unwrap_or_default(),
            amount: row.get(4).map_err(db_err)?,
            payer: row.get(5).map_err(db_err)?,
            participants: decode_list(row.get::<_, String>(6).unwrap_or_default()),
            references: decode_list(row.get::<_, String>(7).unwrap_or_default()),
            created_at: row.get::<_, Option<i64>>(8).unwrap_or(None),
            updated_at: row.get::<_, Option<i64>>(9).unwrap_or(None),
        });
    }
    Ok(activities)
}

fn load_debts(conn: &Connection, outing_id: &str) -> DomainResult<Vec<Debt>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, outing_id, from_user, to_user, amount, status
             FROM debts WHERE outing_id = ? ORDER BY id ASC",
        )
        .map_err(db_err)?;
    let mut rows = stmt.query(params![outing_id]).map_err(db_err)?;

    let mut debts = Vec::new();
    while let Ok(Some(row)) = rows.next() {
        debts.push(Debt {
            id: row.get(0).map_err(db_err)?,
            outing_id: row.get(1).map_err(db_err)?,
            from_user: row.get(2).map_err(db_err)?,
            to_user: row.get(3).map_err(db_err)?,
            amount: row.get(4).map_err(db_err)?,
            status: DebtStatus::from_str(&row.get::<_, String>(5).unwrap_or_default()),
        });
    }
    Ok(debts)
}

/// Convert a database row to Outing (children loaded separately)
fn row_to_outing(row: &rusqlite::Row) -> DomainResult<Outing> {
    Ok(Outing {
        id: row.get(0).map_err(db_err)?,
        title: row.get(1).map_err(db_err)?,
        description: row.get::<_, Option<String>>(2).unwrap_or(None).unwrap_or_default(),
        owner: row.get(3).map_err(db_err)?,
        participants: decode_list(row.get::<_, String>(4).unwrap_or_default()),
        activities: Vec::new(),
        event_ids: decode_list(row.get::<_, String>(5).unwrap_or_default()),
        debts: Vec::new(),
        status: OutingStatus::from_str(&row.get::<_, String>(6).unwrap_or_default()),
        created_at: row.get::<_, Option<i64>>(7).unwrap_or(None),
        updated_at: row.get::<_, Option<i64>>(8).unwrap_or(None),
    })
}
