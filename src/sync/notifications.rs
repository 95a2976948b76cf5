//! Notification Synchronizer
//!
//! Mirrors the remote notification feed. Read-receipts go to the
//! server first and reconcile through a full refetch.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::api::{ApiError, ApiResult, NotificationApi, NotificationDto};
use crate::domain::{Notification, NotificationKind};
use crate::repository::NotificationRepository;
use super::cache::CacheHandle;
use super::session::SessionStore;

/// Shared synchronizer for the notification domain
pub struct NotificationSynchronizer {
    api: Arc<dyn NotificationApi>,
    session: Arc<SessionStore>,
    cache: CacheHandle<Notification>,
}

impl NotificationSynchronizer {
    pub(crate) fn new(
        api: Arc<dyn NotificationApi>,
        session: Arc<SessionStore>,
        repo: NotificationRepository,
    ) -> Self {
        Self {
            api,
            session,
            cache: CacheHandle::spawn(repo, "notifications"),
        }
    }

    /// Re-fetch the feed and republish it.
    ///
    /// Failures are absorbed: they are logged and the previously
    /// published collection stays in place (stale beats empty).
    pub async fn refresh(&self) {
        let token = match self.session.token() {
            Some(token) => token,
            None => {
                warn!("notification refresh skipped: no session token");
                return;
            }
        };
        let seq = self.cache.begin_fetch();
        match self.api.list(&token).await {
            Ok(dtos) => {
                let notifications = dtos.into_iter().map(notification_from_dto).collect();
                self.cache.replace(seq, notifications).await;
            }
            Err(e) => {
                warn!(error = %e, "notification refresh failed, keeping cached collection");
            }
        }
    }

    /// Mark one notification read, then reconcile with a full refetch
    pub async fn mark_read(&self, id: &str) -> ApiResult<Notification> {
        let token = self.session.token().ok_or(ApiError::NoSessionToken)?;
        let dto = self.api.mark_read(&token, id).await?;
        let notification = notification_from_dto(dto);
        self.refresh().await;
        Ok(notification)
    }

    /// Number of published notifications without a read marker
    pub fn unread_count(&self) -> usize {
        self.cache.current().iter().filter(|n| !n.is_read()).count()
    }

    /// Observe the published feed
    pub fn subscribe(&self) -> watch::Receiver<Vec<Notification>> {
        self.cache.subscribe()
    }

    /// Snapshot of the published feed
    pub fn current(&self) -> Vec<Notification> {
        self.cache.current()
    }

    /// Wait for startup hydration and pending writes to settle
    pub(crate) async fn flush(&self) {
        self.cache.flush().await;
    }
}

/// Convert a wire notification into a cache entity
pub(crate) fn notification_from_dto(dto: NotificationDto) -> Notification {
    Notification {
        id: dto.id,
        kind: NotificationKind::from_str(&dto.kind),
        title: dto.title,
        message: dto.message,
        reference_id: dto.reference_id,
        sent_at: dto.sent_at,
        read_at: dto.read_at,
    }
}
