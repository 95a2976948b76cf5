//! Session Store
//!
//! The identity domain's synchronizer, restricted to at most one
//! cached row. Login and signup save the returned session; logout
//! hard-deletes it. Other synchronizers read the bearer token from
//! here before every authenticated call.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;

use crate::api::{ApiResult, IdentityApi, IdentityDto, SignupRequest};
use crate::domain::Identity;
use crate::repository::IdentityRepository;
use super::cache::CacheHandle;

/// Holds the signed-in identity, or nothing
pub struct SessionStore {
    api: Arc<dyn IdentityApi>,
    cache: CacheHandle<Identity>,
}

impl SessionStore {
    pub(crate) fn new(api: Arc<dyn IdentityApi>, repo: IdentityRepository) -> Self {
        Self {
            api,
            cache: CacheHandle::spawn(repo, "identity"),
        }
    }

    /// Authenticate and cache the returned session
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Identity> {
        let dto = self.api.login(email, password).await?;
        let identity = identity_from_dto(dto);
        self.save_session(identity.clone()).await;
        Ok(identity)
    }

    /// Create an account and cache the returned session
    pub async fn signup(&self, params: SignupRequest) -> ApiResult<Identity> {
        let dto = self.api.signup(&params).await?;
        let identity = identity_from_dto(dto);
        self.save_session(identity.clone()).await;
        Ok(identity)
    }

    /// Replace any existing session row with `identity`.
    /// Purge-then-insert: there are never two concurrent sessions.
    pub async fn save_session(&self, identity: Identity) {
        let seq = self.cache.begin_fetch();
        if !self.cache.replace(seq, vec![identity]).await {
            warn!("session save superseded by a concurrent session write");
        }
    }

    /// Hard-delete the cached session (logout)
    pub async fn clear_session(&self) {
        let seq = self.cache.begin_fetch();
        self.cache.replace(seq, Vec::new()).await;
    }

    /// The cached identity, if a session exists
    pub fn current(&self) -> Option<Identity> {
        self.cache.current().into_iter().next()
    }

    /// Bearer token of the cached session, if present and non-empty
    pub fn token(&self) -> Option<String> {
        self.current().filter(Identity::has_token).map(|i| i.token)
    }

    /// True iff a session row with a non-empty token exists
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Observe the session row (at most one element)
    pub fn subscribe(&self) -> watch::Receiver<Vec<Identity>> {
        self.cache.subscribe()
    }

    /// Wait for startup hydration and pending writes to settle
    pub(crate) async fn flush(&self) {
        self.cache.flush().await;
    }
}

/// Convert the wire account record into the cached identity
pub(crate) fn identity_from_dto(dto: IdentityDto) -> Identity {
    Identity {
        id: dto.id,
        name: dto.name,
        email: dto.email,
        phone: dto.phone,
        token: dto.token,
    }
}
