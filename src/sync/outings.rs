//! Outing Synchronizer
//!
//! Keeps the cached outings (with their activities and debts)
//! mirroring the server. Creating an outing appends optimistically so
//! the UI reflects the write immediately; activity and debt writes
//! reconcile through a full refetch instead of patching locally.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::api::{
    ActivityDto, ApiError, ApiResult, DebtDto, NewActivity, NewOuting, OutingApi, OutingDto,
};
use crate::domain::{Activity, Debt, DebtStatus, Outing, OutingStatus};
use crate::repository::OutingRepository;
use super::cache::CacheHandle;
use super::session::SessionStore;

/// Shared synchronizer for the outing domain
pub struct OutingSynchronizer {
    api: Arc<dyn OutingApi>,
    session: Arc<SessionStore>,
    cache: CacheHandle<Outing>,
}

impl OutingSynchronizer {
    pub(crate) fn new(
        api: Arc<dyn OutingApi>,
        session: Arc<SessionStore>,
        repo: OutingRepository,
    ) -> Self {
        Self {
            api,
            session,
            cache: CacheHandle::spawn(repo, "outings"),
        }
    }

    /// Re-fetch all outings and republish them.
    ///
    /// Failures are absorbed: they are logged and the previously
    /// published collection stays in place (stale beats empty).
    pub async fn refresh(&self) {
        let token = match self.session.token() {
            Some(token) => token,
            None => {
                warn!("outing refresh skipped: no session token");
                return;
            }
        };
        let seq = self.cache.begin_fetch();
        match self.api.list(&token).await {
            Ok(dtos) => {
                let outings = dtos.into_iter().map(outing_from_dto).collect();
                self.cache.replace(seq, outings).await;
            }
            Err(e) => warn!(error = %e, "outing refresh failed, keeping cached collection"),
        }
    }

    /// Create an outing and append it to the published collection
    /// without a refetch, so the write is visible immediately. The
    /// next full refresh supersedes the appended row.
    pub async fn create(&self, params: NewOuting) -> ApiResult<Outing> {
        let token = self.session.token().ok_or(ApiError::NoSessionToken)?;
        let dto = self.api.create(&token, &params).await?;
        let outing = outing_from_dto(dto);
        self.cache.append(outing.clone()).await;
        Ok(outing)
    }

    /// Add an expense activity, then reconcile with a full refetch
    pub async fn add_activity(
        &self,
        outing_id: &str,
        params: NewActivity,
    ) -> ApiResult<Outing> {
        let token = self.session.token().ok_or(ApiError::NoSessionToken)?;
        let dto = self.api.add_activity(&token, outing_id, &params).await?;
        let outing = outing_from_dto(dto);
        self.refresh().await;
        Ok(outing)
    }

    /// Settle one debt, then reconcile with a full refetch
    pub async fn mark_debt_paid(&self, outing_id: &str, debt_id: &str) -> ApiResult<Outing> {
        let token = self.session.token().ok_or(ApiError::NoSessionToken)?;
        let dto = self.api.mark_debt_paid(&token, outing_id, debt_id).await?;
        let outing = outing_from_dto(dto);
        self.refresh().await;
        Ok(outing)
    }

    /// Observe the published outings
    pub fn subscribe(&self) -> watch::Receiver<Vec<Outing>> {
        self.cache.subscribe()
    }

    /// Snapshot of the published outings
    pub fn current(&self) -> Vec<Outing> {
        self.cache.current()
    }

    /// Look up one published outing by id
    pub fn find(&self, id: &str) -> Option<Outing> {
        self.cache.current().into_iter().find(|o| o.id == id)
    }

    /// Wait for startup hydration and pending writes to settle
    pub(crate) async fn flush(&self) {
        self.cache.flush().await;
    }
}

/// Convert a wire outing (children inlined) into a cache entity
pub(crate) fn outing_from_dto(dto: OutingDto) -> Outing {
    let activities = dto
        .activities
        .unwrap_or_default()
        .into_iter()
        .map(|a| activity_from_dto(&dto.id, a))
        .collect();
    let debts = dto
        .debts
        .unwrap_or_default()
        .into_iter()
        .map(|d| debt_from_dto(&dto.id, d))
        .collect();
    Outing {
        id: dto.id,
        title: dto.title,
        description: dto.description,
        owner: dto.owner,
        participants: dto.participants.unwrap_or_default(),
        activities,
        event_ids: dto.events.unwrap_or_default(),
        debts,
        status: OutingStatus::from_str(&dto.status),
        created_at: dto.created_at,
        updated_at: dto.updated_at,
    }
}

pub(crate) fn activity_from_dto(outing_id: &str, dto: ActivityDto) -> Activity {
    Activity {
        id: dto.id,
        outing_id: outing_id.to_string(),
        title: dto.title,
        description: dto.description,
        amount: dto.amount,
        payer: dto.payer,
        participants: dto.participants,
        references: dto.references.unwrap_or_default(),
        created_at: dto.created_at,
        updated_at: dto.updated_at,
    }
}

pub(crate) fn debt_from_dto(outing_id: &str, dto: DebtDto) -> Debt {
    Debt {
        id: dto.id,
        outing_id: outing_id.to_string(),
        from_user: dto.from_user,
        to_user: dto.to_user,
        amount: dto.amount,
        status: DebtStatus::from_str(&dto.status),
    }
}
