//! Gather Core
//!
//! Headless application core for Gather: discover events, form group
//! outings, split expenses. The presentation shell links this crate
//! and talks only to the synchronizers' observable collections and
//! write operations.
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - api: Wire codec, error taxonomy, per-domain remote clients
//! - repository: On-device SQLite caches of remote state
//! - sync: Per-domain synchronizers (fetch, convert, replace, republish)
//! - filter: Client-side event filtering (type, date, distance)

use std::path::PathBuf;
use std::sync::Arc;

pub mod api;
pub mod domain;
pub mod filter;
pub mod logging;
pub mod platform;
pub mod repository;
pub mod sync;

use api::{ApiClient, EventClient, IdentityClient, NotificationClient, OutingClient};
use domain::{DomainResult, Event};
use filter::EventFilters;
use platform::LocationProvider;
use repository::{
    init_db, DbState, EventRepository, IdentityRepository, NotificationRepository,
    OutingRepository,
};
use sync::{EventSynchronizer, NotificationSynchronizer, OutingSynchronizer, SessionStore};

/// Configuration supplied by the embedding shell
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the remote API, e.g. "https://api.gather.app"
    pub api_base_url: String,
    /// Path of the on-device cache database
    pub db_path: PathBuf,
}

/// Application state shared with the embedding shell
///
/// Holds exactly one synchronizer per domain: every screen observes
/// the same instance instead of instantiating its own, so a given
/// fetch happens once no matter how many surfaces are showing.
pub struct AppCore {
    db_state: DbState,
    pub session: Arc<SessionStore>,
    pub events: Arc<EventSynchronizer>,
    pub outings: Arc<OutingSynchronizer>,
    pub notifications: Arc<NotificationSynchronizer>,
}

impl AppCore {
    /// Open the cache database and wire up every domain.
    ///
    /// Returns after the caches have surfaced whatever the previous
    /// run persisted, so a restored session is visible immediately.
    pub async fn new(config: AppConfig) -> DomainResult<Self> {
        let db_state = init_db(&config.db_path).await?;
        let api = Arc::new(ApiClient::new(config.api_base_url));

        let session = Arc::new(SessionStore::new(
            Arc::new(IdentityClient::new(api.clone())),
            IdentityRepository::new(db_state.handle()),
        ));
        let events = Arc::new(EventSynchronizer::new(
            Arc::new(EventClient::new(api.clone())),
            session.clone(),
            EventRepository::new(db_state.handle()),
        ));
        let outings = Arc::new(OutingSynchronizer::new(
            Arc::new(OutingClient::new(api.clone())),
            session.clone(),
            OutingRepository::new(db_state.handle()),
        ));
        let notifications = Arc::new(NotificationSynchronizer::new(
            Arc::new(NotificationClient::new(api)),
            session.clone(),
            NotificationRepository::new(db_state.handle()),
        ));

        session.flush().await;
        events.flush().await;
        outings.flush().await;
        notifications.flush().await;

        Ok(Self {
            db_state,
            session,
            events,
            outings,
            notifications,
        })
    }

    /// Refresh every domain cache (app foreground, pull-to-refresh)
    pub async fn refresh_all(&self) {
        tokio::join!(
            self.events.refresh(),
            self.outings.refresh(),
            self.notifications.refresh(),
        );
    }

    /// Published events within `radius_km` of the device, after the
    /// given type/date criteria. Fails closed to an empty result when
    /// no location fix is available.
    pub async fn nearby_events(
        &self,
        location: &dyn LocationProvider,
        mut filters: EventFilters,
        radius_km: f64,
    ) -> Vec<Event> {
        filters.origin = location.current_location().await;
        filters.radius_km = Some(radius_km);
        filters.apply(&self.events.current())
    }

    /// Drop the database connection, flushing SQLite state to disk
    pub async fn close(&self) {
        self.db_state.close().await;
    }
}
