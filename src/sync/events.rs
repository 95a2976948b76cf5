//! Event Synchronizer
//!
//! Keeps the local event catalogue mirroring the remote one:
//! fetch, convert, replace, republish. Purchases go to the server
//! first and reconcile through a full refetch rather than patching
//! rows locally.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::api::{ApiError, ApiResult, EventApi, EventDto};
use crate::domain::{Event, EventType, Location, Organizer, TicketType};
use crate::repository::EventRepository;
use super::cache::CacheHandle;
use super::session::SessionStore;

/// Shared synchronizer for the event domain
pub struct EventSynchronizer {
    api: Arc<dyn EventApi>,
    session: Arc<SessionStore>,
    cache: CacheHandle<Event>,
}

impl EventSynchronizer {
    pub(crate) fn new(
        api: Arc<dyn EventApi>,
        session: Arc<SessionStore>,
        repo: EventRepository,
    ) -> Self {
        Self {
            api,
            session,
            cache: CacheHandle::spawn(repo, "events"),
        }
    }

    /// Re-fetch the whole catalogue and republish it.
    ///
    /// Failures are absorbed: they are logged and the previously
    /// published collection stays in place (stale beats empty).
    pub async fn refresh(&self) {
        let token = match self.session.token() {
            Some(token) => token,
            None => {
                warn!("event refresh skipped: no session token");
                return;
            }
        };
        let seq = self.cache.begin_fetch();
        match self.api.list(&token).await {
            Ok(dtos) => {
                let events = dtos.into_iter().map(event_from_dto).collect();
                self.cache.replace(seq, events).await;
            }
            Err(e) => warn!(error = %e, "event refresh failed, keeping cached collection"),
        }
    }

    /// Fetch one event's detail and upsert it into the cache
    pub async fn refresh_event(&self, id: &str) -> ApiResult<Event> {
        let token = self.session.token().ok_or(ApiError::NoSessionToken)?;
        let dto = self.api.get(&token, id).await?;
        let event = event_from_dto(dto);
        self.cache.upsert(event.clone()).await;
        Ok(event)
    }

    /// Buy tickets, then reconcile the catalogue with a full refetch
    pub async fn purchase_tickets(
        &self,
        event_id: &str,
        ticket_type: &str,
        quantity: u32,
    ) -> ApiResult<Event> {
        let token = self.session.token().ok_or(ApiError::NoSessionToken)?;
        let dto = self
            .api
            .purchase_tickets(&token, event_id, ticket_type, quantity)
            .await?;
        let event = event_from_dto(dto);
        self.refresh().await;
        Ok(event)
    }

    /// Observe the published catalogue
    pub fn subscribe(&self) -> watch::Receiver<Vec<Event>> {
        self.cache.subscribe()
    }

    /// Snapshot of the published catalogue
    pub fn current(&self) -> Vec<Event> {
        self.cache.current()
    }

    /// Look up one published event by id
    pub fn find(&self, id: &str) -> Option<Event> {
        self.cache.current().into_iter().find(|e| e.id == id)
    }

    /// Wait for startup hydration and pending writes to settle
    pub(crate) async fn flush(&self) {
        self.cache.flush().await;
    }
}

/// Convert a wire event into a cache entity, defaulting absent
/// optional fields domain-appropriately (missing capacity means 0,
/// missing lists mean empty)
pub(crate) fn event_from_dto(dto: EventDto) -> Event {
    Event {
        id: dto.id,
        title: dto.title,
        description: dto.description,
        event_type: EventType::from_str(&dto.event_type),
        location: Location {
            name: dto.location.name,
            address: dto.location.address,
            coordinates: dto.location.coordinates,
        },
        date: dto.date,
        organizer: Organizer {
            name: dto.organizer.name,
            phone: dto.organizer.phone,
            email: dto.organizer.email,
        },
        capacity: dto.capacity.unwrap_or(0),
        sold: dto.sold.unwrap_or(0),
        amenities: dto.amenities.unwrap_or_default(),
        requirements: dto.requirements.unwrap_or_default(),
        ticket_types: dto
            .ticket_types
            .unwrap_or_default()
            .into_iter()
            .map(|t| TicketType {
                name: t.name,
                price: t.price,
                total_quantity: t.total_quantity,
                sold_quantity: t.sold_quantity,
            })
            .collect(),
        weather: dto.weather.unwrap_or_default(),
        created_at: dto.created_at,
        updated_at: dto.updated_at,
    }
}
