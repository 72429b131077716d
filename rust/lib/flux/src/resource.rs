//! Stateful list holders for the UI.
//!
//! A [`Resource`] owns the client-side copy of one entity list and exposes
//! the loading/error contract the screens render from:
//! `{data, is_loading, error}` plus `fetch_data` and `set_data`.
//! Every change is also published to the shared [`StateStore`] at the
//! resource's path so views can subscribe instead of polling.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use friendframe_client::{ApiError, IdentityProvider};
use tracing::{debug, warn};

use crate::store::StateStore;

// ── ResourceSource ──────────────────────────────────────────────────

/// Where a resource gets its full list from.
#[async_trait::async_trait]
pub trait ResourceSource<T>: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<T>, ApiError>;
}

// ── State ───────────────────────────────────────────────────────────

/// What the resource knows about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// The identity provider has not loaded yet.
    Pending,
    SignedIn,
    /// Loaded with nobody signed in. Terminal until identity changes.
    SignedOut,
}

/// Stored failure of the most recent fetch.
///
/// The message is fixed per entity ("Failed to fetch groups"); the
/// underlying client error is kept as the source.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    entity: &'static str,
    message: String,
    #[source]
    source: Arc<ApiError>,
}

impl FetchError {
    pub fn new(entity: &'static str, source: ApiError) -> Self {
        Self {
            entity,
            message: format!("Failed to fetch {}", entity),
            source: Arc::new(source),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn api_error(&self) -> &ApiError {
        &self.source
    }

    pub fn is_authentication(&self) -> bool {
        self.source.is_authentication()
    }
}

/// Snapshot of a resource, as published to the store.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// `None` until the first successful fetch or `set_data`.
    pub data: Option<Vec<T>>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub session: Session,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
            session: Session::Pending,
        }
    }
}

/// Result of a `fetch_data` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(usize),
    Failed,
    /// Another fetch was already in flight; nothing was sent.
    Coalesced,
}

// ── Resource ────────────────────────────────────────────────────────

/// Everything guarded by the resource's one mutex.
struct Inner<T> {
    state: ResourceState<T>,
    /// A fetch holds the loading flag.
    in_flight: bool,
    /// Last (loaded, signed_in) pair passed to `sync_identity`.
    identity: (bool, bool),
    /// Bumped on every change; the publisher loops until it has sent the
    /// latest one.
    version: u64,
    publishing: bool,
}

/// Client-side cache of one entity list.
///
/// Concurrent `fetch_data` calls coalesce: while one is in flight, further
/// calls return [`FetchOutcome::Coalesced`] without touching the network.
/// Optimistic edits through `set_data` are not reconciled with an in-flight
/// fetch; whichever write completes last wins.
///
/// State changes and the in-flight flag share one mutex, and snapshots reach
/// the store in version order, so the store never ends on an older snapshot
/// than the resource holds.
pub struct Resource<T> {
    entity: &'static str,
    path: String,
    source: Arc<dyn ResourceSource<T>>,
    store: Arc<StateStore>,
    inner: Mutex<Inner<T>>,
}

impl<T> Resource<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `entity` names the list in error messages; `path` is where snapshots
    /// are published.
    pub fn new(
        entity: &'static str,
        path: impl Into<String>,
        source: Arc<dyn ResourceSource<T>>,
        store: Arc<StateStore>,
    ) -> Self {
        let resource = Self {
            entity,
            path: path.into(),
            source,
            store,
            inner: Mutex::new(Inner {
                state: ResourceState::default(),
                in_flight: false,
                identity: (false, false),
                version: 0,
                publishing: false,
            }),
        };
        resource.update(|_| true);
        resource
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    pub fn snapshot(&self) -> ResourceState<T> {
        self.lock().state.clone()
    }

    pub fn data(&self) -> Option<Vec<T>> {
        self.lock().state.data.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading
    }

    pub fn error(&self) -> Option<FetchError> {
        self.lock().state.error.clone()
    }

    pub fn session(&self) -> Session {
        self.lock().state.session
    }

    /// Replace the cached list in full, pending or not.
    pub fn set_data(&self, data: Vec<T>) {
        self.update(|inner| {
            inner.state.data = Some(data);
            true
        });
    }

    /// Edit the cached list in place, starting from empty if nothing has
    /// been loaded.
    pub fn update_data<F>(&self, edit: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        self.update(|inner| {
            edit(inner.state.data.get_or_insert_with(Vec::new));
            true
        });
    }

    /// Fetch the full list and replace the cache.
    ///
    /// On failure the previous data is left untouched and the error is
    /// stored; nothing is returned as `Err` because the UI renders errors
    /// from state.
    pub async fn fetch_data(&self) -> FetchOutcome {
        let Some(guard) = LoadingGuard::acquire(self) else {
            debug!("{}: fetch already in flight, coalescing", self.entity);
            return FetchOutcome::Coalesced;
        };

        match self.source.list().await {
            Ok(items) => {
                let count = items.len();
                debug!("{}: loaded {} items", self.entity, count);
                guard.finish(|s| {
                    s.data = Some(items);
                    s.error = None;
                });
                FetchOutcome::Loaded(count)
            }
            Err(e) => {
                warn!("{}: fetch failed: {}", self.entity, e);
                let error = FetchError::new(self.entity, e);
                guard.finish(|s| s.error = Some(error));
                FetchOutcome::Failed
            }
        }
    }

    /// Feed the identity provider's current state.
    ///
    /// Fetches once on each transition into loaded-and-signed-in. Loaded but
    /// signed out settles to [`Session::SignedOut`] with loading cleared
    /// unless a fetch still holds it. Returns the outcome when a fetch ran.
    pub async fn sync_identity(&self, loaded: bool, signed_in: bool) -> Option<FetchOutcome> {
        let mut became_ready = false;
        self.update(|inner| {
            let was_ready = inner.identity == (true, true);
            inner.identity = (loaded, signed_in);
            let session = match (loaded, signed_in) {
                (true, true) => {
                    became_ready = !was_ready;
                    Session::SignedIn
                }
                (true, false) => {
                    inner.state.is_loading = inner.in_flight;
                    Session::SignedOut
                }
                (false, _) => Session::Pending,
            };
            inner.state.session = session;
            true
        });

        if became_ready {
            return Some(self.fetch_data().await);
        }
        if loaded && !signed_in {
            debug!("{}: signed out, nothing to fetch", self.entity);
        }
        None
    }

    /// [`sync_identity`](Self::sync_identity) reading straight from a provider.
    pub async fn sync_with(&self, identity: &dyn IdentityProvider) -> Option<FetchOutcome> {
        self.sync_identity(identity.is_loaded(), identity.is_signed_in())
            .await
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` under the lock and, when it reports a change, publish.
    ///
    /// Only one caller publishes at a time. A change made while another
    /// caller is publishing (including from a store handler) is picked up by
    /// that caller's next loop turn.
    fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut Inner<T>) -> bool,
    {
        let mut inner = self.lock();
        if !f(&mut *inner) {
            return false;
        }
        inner.version += 1;
        if inner.publishing {
            return true;
        }
        inner.publishing = true;
        loop {
            let version = inner.version;
            let snapshot = inner.state.clone();
            drop(inner);
            self.store.set(&self.path, snapshot);
            inner = self.lock();
            if inner.version == version {
                inner.publishing = false;
                return true;
            }
        }
    }
}

// ── LoadingGuard ────────────────────────────────────────────────────

/// Holds the loading flag for one fetch.
///
/// `finish` applies the result and clears loading in a single update. If the
/// fetch future is dropped first, `Drop` clears it instead.
struct LoadingGuard<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    resource: &'a Resource<T>,
    finished: bool,
}

impl<'a, T> LoadingGuard<'a, T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `None` when another fetch already holds the flag.
    fn acquire(resource: &'a Resource<T>) -> Option<Self> {
        let acquired = resource.update(|inner| {
            if inner.in_flight {
                return false;
            }
            inner.in_flight = true;
            inner.state.is_loading = true;
            true
        });
        acquired.then_some(Self {
            resource,
            finished: false,
        })
    }

    fn finish<F>(mut self, f: F)
    where
        F: FnOnce(&mut ResourceState<T>),
    {
        self.finished = true;
        self.release(f);
    }

    fn release<F>(&self, f: F)
    where
        F: FnOnce(&mut ResourceState<T>),
    {
        self.resource.update(|inner| {
            f(&mut inner.state);
            inner.state.is_loading = false;
            inner.in_flight = false;
            true
        });
    }
}

impl<T> Drop for LoadingGuard<'_, T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if !self.finished {
            self.release(|_| {});
        }
    }
}
