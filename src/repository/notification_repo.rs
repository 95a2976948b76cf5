//! Notification Repository
//!
//! SQLite cache for the notification feed.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Notification, NotificationKind};
use super::db::db_err;
use super::event_repo::delete_absent;
use super::traits::CacheRepository;

/// SQLite implementation of the notification cache
pub struct NotificationRepository {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl NotificationRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheRepository<Notification> for NotificationRepository {
    async fn replace_all(&self, entities: &[Notification]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction().map_err(db_err)?;
        delete_absent(&tx, "notifications", entities.iter().map(|n| n.id.as_str()))?;
        for notification in entities {
            upsert_notification(&tx, notification)?;
        }
        tx.commit().map_err(db_err)
    }

    async fn upsert(&self, entity: &Notification) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        upsert_notification(conn, entity)
    }

    async fn list(&self) -> DomainResult<Vec<Notification>> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, kind, title, message, reference_id, sent_at, read_at
                 FROM notifications ORDER BY sent_at DESC",
            )
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut notifications = Vec::new();
        while let Ok(Some(row)) = rows.next() {
            notifications.push(row_to_notification(row)?);
        }
        Ok(notifications)
    }

    async fn clear(&self) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        conn.execute("DELETE FROM notifications", []).map_err(db_err)?;
        Ok(())
    }
}

fn upsert_notification(conn: &Connection, notification: &Notification) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO notifications (id, kind, title, message, reference_id, sent_at, read_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             kind = excluded.kind,
             title = excluded.title,
             message = excluded.message,
             reference_id = excluded.reference_id,
             sent_at = excluded.sent_at,
             read_at = excluded.read_at",
        params![
            notification.id,
            notification.kind.as_str(),
            notification.title,
            notification.message,
            notification.reference_id,
            notification.sent_at,
            notification.read_at
        ],
    )
    .map_err(db_err)?;
    Ok(())
}

/// Convert a database row to Notification
fn row_to_notification(row: &rusqlite::Row) -> DomainResult<Notification> {
    Ok(Notification {
        id: row.get(0).map_err(db_err)?,
        kind: NotificationKind::from_str(&row.get::<_, String>(1).unwrap_or_default()),
        title: row.get(2).map_err(db_err)?,
        message: row.get::<_, Option<String>>(3).unwrap_or(None).unwrap_or_default(),
        reference_id: row.get::<_, Option<String>>(4).unwrap_or(None).unwrap_or_default(),
        sent_at: row.get(5).map_err(db_err)?,
        read_at: row.get::<_, Option<i64>>(6).unwrap_or(None),
    })
}
