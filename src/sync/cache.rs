//! Cache Actor
//!
//! One single-consumer task per domain that exclusively owns that
//! domain's cached collection: the SQLite repository, the in-memory
//! copy, and the watch channel observers subscribe to. Every mutation
//! arrives as a message on the inbox; no other execution context
//! touches the collection, which is what makes out-of-order network
//! completions safe without locks.
//!
//! Fetches are sequenced: a fetch allocates its sequence number before
//! the network call starts, and the actor applies a replacement only
//! when that number is still the latest issued. A slow response that
//! was superseded by a newer fetch is discarded instead of clobbering
//! fresher state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use crate::domain::Entity;
use crate::repository::CacheRepository;

enum CacheCommand<T> {
    /// Full-collection replacement from a completed fetch
    Replace {
        seq: u64,
        items: Vec<T>,
        done: oneshot::Sender<bool>,
    },
    /// Optimistic append after a successful create call
    Append { item: T, done: oneshot::Sender<()> },
    /// Keyed single-row refresh from a detail fetch
    Upsert { item: T, done: oneshot::Sender<()> },
    /// Barrier: resolves once every earlier command has been applied
    Flush { done: oneshot::Sender<()> },
}

/// Handle to one domain's cache actor
pub struct CacheHandle<T: Entity> {
    inbox: mpsc::Sender<CacheCommand<T>>,
    issued: Arc<AtomicU64>,
    state: watch::Receiver<Vec<T>>,
}

impl<T: Entity + 'static> CacheHandle<T> {
    /// Spawn the actor owning `repo`. The actor first publishes
    /// whatever the previous run persisted (warm start), then applies
    /// inbox commands in order until the handle is dropped.
    pub(crate) fn spawn<R>(repo: R, domain: &'static str) -> Self
    where
        R: CacheRepository<T> + 'static,
    {
        let (inbox, mut rx) = mpsc::channel::<CacheCommand<T>>(32);
        let (state_tx, state_rx) = watch::channel(Vec::new());
        let issued = Arc::new(AtomicU64::new(0));
        let latest = issued.clone();

        tokio::spawn(async move {
            match repo.list().await {
                Ok(items) => {
                    if !items.is_empty() {
                        let _ = state_tx.send(items);
                    }
                }
                Err(e) => warn!(domain, error = %e, "cache hydration failed"),
            }

            while let Some(command) = rx.recv().await {
                match command {
                    CacheCommand::Replace { seq, items, done } => {
                        if seq != latest.load(Ordering::SeqCst) {
                            debug!(domain, seq, "discarding superseded fetch result");
                            let _ = done.send(false);
                            continue;
                        }
                        // The server already moved; if the disk mirror
                        // cannot keep up it reconverges on the next fetch.
                        if let Err(e) = repo.replace_all(&items).await {
                            warn!(domain, error = %e, "cache write failed, publishing in-memory state");
                        }
                        let _ = state_tx.send(items);
                        let _ = done.send(true);
                    }
                    CacheCommand::Append { item, done } => {
                        if let Err(e) = repo.upsert(&item).await {
                            warn!(domain, error = %e, "cache append failed, publishing in-memory state");
                        }
                        let mut items = state_tx.borrow().clone();
                        items.push(item);
                        let _ = state_tx.send(items);
                        let _ = done.send(());
                    }
                    CacheCommand::Upsert { item, done } => {
                        if let Err(e) = repo.upsert(&item).await {
                            warn!(domain, error = %e, "cache upsert failed, publishing in-memory state");
                        }
                        let mut items = state_tx.borrow().clone();
                        match items.iter().position(|i| i.id() == item.id()) {
                            Some(pos) => items[pos] = item,
                            None => items.push(item),
                        }
                        let _ = state_tx.send(items);
                        let _ = done.send(());
                    }
                    CacheCommand::Flush { done } => {
                        let _ = done.send(());
                    }
                }
            }
        });

        Self {
            inbox,
            issued,
            state: state_rx,
        }
    }

    /// Allocate the sequence number for a fetch that is about to start
    pub(crate) fn begin_fetch(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a completed fetch. Returns false when the result was
    /// superseded by a later fetch and therefore discarded.
    pub(crate) async fn replace(&self, seq: u64, items: Vec<T>) -> bool {
        let (done, wait) = oneshot::channel();
        if self
            .inbox
            .send(CacheCommand::Replace { seq, items, done })
            .await
            .is_err()
        {
            return false;
        }
        wait.await.unwrap_or(false)
    }

    pub(crate) async fn append(&self, item: T) {
        let (done, wait) = oneshot::channel();
        if self.inbox.send(CacheCommand::Append { item, done }).await.is_ok() {
            let _ = wait.await;
        }
    }

    pub(crate) async fn upsert(&self, item: T) {
        let (done, wait) = oneshot::channel();
        if self.inbox.send(CacheCommand::Upsert { item, done }).await.is_ok() {
            let _ = wait.await;
        }
    }

    /// Wait until every command sent so far (and warm-start hydration)
    /// has been applied
    pub(crate) async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.inbox.send(CacheCommand::Flush { done }).await.is_ok() {
            let _ = wait.await;
        }
    }

    /// Observe the published collection; the receiver yields the
    /// current value immediately and every replacement after it
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.state.clone()
    }

    /// Snapshot of the currently published collection
    pub fn current(&self) -> Vec<T> {
        self.state.borrow().clone()
    }
}
