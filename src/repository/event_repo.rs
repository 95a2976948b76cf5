//! Event Repository
//!
//! SQLite cache for the event catalogue. List-valued fields
//! (amenities, requirements, ticket tiers) are stored as JSON text
//! columns; everything else is a plain column.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult, Event, EventType, Location, Organizer};
use super::db::db_err;
use super::traits::CacheRepository;

/// SQLite implementation of the event cache
pub struct EventRepository {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl EventRepository {
    pub fn new(conn: Arc<Mutex<Option<Connection>>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheRepository<Event> for EventRepository {
    async fn replace_all(&self, entities: &[Event]) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let conn = guard
            .as_mut()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.transaction().map_err(db_err)?;
        delete_absent(&tx, "events", entities.iter().map(|e| e.id.as_str()))?;
        for event in entities {
            upsert_event(&tx, event)?;
        }
        tx.commit().map_err(db_err)
    }

    async fn upsert(&self, entity: &Event) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        upsert_event(conn, entity)
    }

    async fn list(&self) -> DomainResult<Vec<Event>> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn
            .prepare(
                "SELECT id, title, description, event_type, location_name, location_address,
                        coordinates, date, organizer_name, organizer_phone, organizer_email,
                        capacity, sold, amenities, requirements, ticket_types, weather,
                        created_at, updated_at
                 FROM events ORDER BY date ASC",
            )
            .map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        let mut events = Vec::new();
        while let Ok(Some(row)) = rows.next() {
            events.push(row_to_event(row)?);
        }
        Ok(events)
    }

    async fn clear(&self) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard
            .as_ref()
            .ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        conn.execute("DELETE FROM events", []).map_err(db_err)?;
        Ok(())
    }
}

/// Delete rows of `table` whose id is not in `keep`
pub(super) fn delete_absent<'a>(
    conn: &Connection,
    table: &str,
    keep: impl Iterator<Item = &'a str>,
) -> DomainResult<()> {
    let ids: Vec<&str> = keep.collect();
    if ids.is_empty() {
        conn.execute(&format!("DELETE FROM {}", table), [])
            .map_err(db_err)?;
        return Ok(());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    conn.execute(
        &format!("DELETE FROM {} WHERE id NOT IN ({})", table, placeholders),
        rusqlite::params_from_iter(ids.iter()),
    )
    .map_err(db_err)?;
    Ok(())
}

fn upsert_event(conn: &Connection, event: &Event) -> DomainResult<()> {
    let amenities = serde_json::to_string(&event.amenities)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let requirements = serde_json::to_string(&event.requirements)
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let ticket_types = serde_json::to_string(&event.ticket_types)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    conn.execute(
        "INSERT INTO events (id, title, description, event_type, location_name,
                             location_address, coordinates, date, organizer_name,
                             organizer_phone, organizer_email, capacity, sold, amenities,
                             requirements, ticket_types, weather, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             title = excluded.title,
             description = excluded.description,
             event_type = excluded.event_type,
             location_name = excluded.location_name,
             location_address = excluded.location_address,
             coordinates = excluded.coordinates,
             date = excluded.date,
             organizer_name = excluded.organizer_name,
             organizer_phone = excluded.organizer_phone,
             organizer_email = excluded.organizer_email,
             capacity = excluded.capacity,
             sold = excluded.sold,
             amenities = excluded.amenities,
             requirements = excluded.requirements,
             ticket_types = excluded.ticket_types,
             weather = excluded.weather,
             created_at = excluded.created_at,
             updated_at = excluded.updated_at",
        params![
            event.id,
            event.title,
            event.description,
            event.event_type.as_str(),
            event.location.name,
            event.location.address,
            event.location.coordinates,
            event.date,
            event.organizer.name,
            event.organizer.phone,
            event.organizer.email,
            event.capacity,
            event.sold,
            amenities,
            requirements,
            ticket_types,
            event.weather,
            event.created_at,
            event.updated_at
        ],
    )
    .map_err(db_err)?;
    Ok(())
}

/// Convert a database row to Event
fn row_to_event(row: &rusqlite::Row) -> DomainResult<Event> {
    Ok(Event {
        id: row.get(0).map_err(db_err)?,
        title: row.get(1).map_err(db_err)?,
        description: row.get::<_, Option<String>>(2).unwrap_or(None).unwrap_or_default(),
        event_type: EventType::from_str(&row.get::<_, String>(3).unwrap_or_default()),
        location: Location {
            name: row.get::<_, Option<String>>(4).unwrap_or(None).unwrap_or_default(),
            address: row.get::<_, Option<String>>(5).unwrap_or(None).unwrap_or_default(),
            coordinates: row.get::<_, Option<String>>(6).unwrap_or(None),
        },
        date: row.get(7).map_err(db_err)?,
        organizer: Organizer {
            name: row.get::<_, Option<String>>(8).unwrap_or(None).unwrap_or_default(),
            phone: row.get::<_, Option<String>>(9).unwrap_or(None).unwrap_or_default(),
            email: row.get::<_, Option<String>>(10).unwrap_or(None).unwrap_or_default(),
        },
        capacity: row.get::<_, u32>(11).unwrap_or(0),
        sold: row.get::<_, u32>(12).unwrap_or(0),
        amenities: decode_list(row.get::<_, String>(13).unwrap_or_default()),
        requirements: decode_list(row.get::<_, String>(14).unwrap_or_default()),
        ticket_types: serde_json::from_str(&row.get::<_, String>(15).unwrap_or_default())
            .unwrap_or_default(),
        weather: row.get::<_, Option<String>>(16).unwrap_or(None).unwrap_or_default(),
        created_at: row.get::<_, Option<i64>>(17).unwrap_or(None),
        updated_at: row.get::<_, Option<i64>>(18).unwrap_or(None),
    })
}

/// Decode a JSON string-list column, tolerating legacy empty values
pub(super) fn decode_list(raw: String) -> Vec<String> {
    serde_json::from_str(&raw).unwrap_or_default()
}
