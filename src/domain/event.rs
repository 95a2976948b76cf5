//! Event Entity
//!
//! A discoverable event fetched from the remote catalogue and cached
//! locally. Rows are wholesale-recreated on every successful fetch.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Event category used for client-side filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Concert,
    Sports,
    Theater,
    Festival,
    Conference,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Concert => "concert",
            EventType::Sports => "sports",
            EventType::Theater => "theater",
            EventType::Festival => "festival",
            EventType::Conference => "conference",
            EventType::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "concert" => EventType::Concert,
            "sports" => EventType::Sports,
            "theater" => EventType::Theater,
            "festival" => EventType::Festival,
            "conference" => EventType::Conference,
            _ => EventType::Other,
        }
    }
}

/// Where an event takes place
///
/// Coordinates are kept as the raw "lat,lon" text the server sends;
/// parsing happens at filter time so a malformed pair excludes the
/// event from distance filtering instead of crashing conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub coordinates: Option<String>,
}

/// Contact details of the event organizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Organizer {
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// One purchasable ticket tier of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketType {
    pub name: String,
    pub price: f64,
    pub total_quantity: u32,
    pub sold_quantity: u32,
}

impl TicketType {
    /// Remaining tickets; derived, never stored
    pub fn available(&self) -> u32 {
        self.total_quantity.saturating_sub(self.sold_quantity)
    }
}

/// A cached event from the remote catalogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Server-issued event ID
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub location: Location,
    /// Event date as unix epoch milliseconds
    pub date: i64,
    pub organizer: Organizer,
    pub capacity: u32,
    pub sold: u32,
    pub amenities: Vec<String>,
    pub requirements: Vec<String>,
    pub ticket_types: Vec<TicketType>,
    pub weather: String,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Event {
    /// Remaining overall capacity; derived, never stored
    pub fn available_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.sold)
    }

    /// Event date as a chrono timestamp, for presentation layers
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.date).single()
    }
}

impl Entity for Event {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
