//! Client-side Event Filtering
//!
//! Pure predicate evaluation over the already-fetched catalogue. None
//! of these criteria are ever pushed into the remote query: the server
//! returns the whole collection and the device narrows it down.
//! Filters AND together and are order-independent.

use serde::{Deserialize, Serialize};

use crate::domain::{Event, EventType};

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Composable filters over the cached event collection
///
/// Unset criteria pass everything through. The distance criterion
/// fails closed: with a radius set but no device fix, or an event
/// without parseable coordinates, the event is excluded.
#[derive(Debug, Clone, Default)]
pub struct EventFilters {
    pub event_type: Option<EventType>,
    /// Inclusive lower bound on the event date (unix ms)
    pub start_ms: Option<i64>,
    /// Inclusive upper bound on the event date (unix ms)
    pub end_ms: Option<i64>,
    /// Device location fix, if any
    pub origin: Option<Coordinates>,
    pub radius_km: Option<f64>,
}

impl EventFilters {
    /// Whether `event` passes every set criterion
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(expected) = self.event_type {
            if event.event_type != expected {
                return false;
            }
        }
        if let Some(start) = self.start_ms {
            if event.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_ms {
            if event.date > end {
                return false;
            }
        }
        if let Some(radius) = self.radius_km {
            let origin = match &self.origin {
                Some(origin) => origin,
                None => return false,
            };
            let coords = match event
                .location
                .coordinates
                .as_deref()
                .and_then(parse_coordinates)
            {
                Some(coords) => coords,
                None => return false,
            };
            if haversine_km(origin, &coords) > radius {
                return false;
            }
        }
        true
    }

    /// The events that pass every set criterion, in input order
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }
}

/// Parse a "lat,lon" pair. Returns None for anything malformed or out
/// of range; callers treat that as "no coordinates".
pub fn parse_coordinates(raw: &str) -> Option<Coordinates> {
    let (lat, lon) = raw.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return None;
    }
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Coordinates::new(latitude, longitude))
}

/// Great-circle distance between two points, in kilometers
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
