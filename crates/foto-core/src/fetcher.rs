//! Path-bound listing fetcher.
//!
//! Watches a [`NavigationState`]; on every path change it resolves the
//! effective path (empty means the default path), GETs it through a
//! [`ListingClient`] and stores the payload on success. Failures are logged
//! and leave the stored listing untouched.
//!
//! When paths change faster than responses arrive, the most recently issued
//! request wins: each change bumps a generation and a response is only stored
//! if its generation is still current. Older requests are not cancelled, their
//! results are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::ListingClient;
use crate::listing::{resolve_path_or, Listing, DEFAULT_PATH};
use crate::navigation::{NavigationState, SubscriptionId};

/// A stored listing and the effective path it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedListing {
    pub path: String,
    pub listing: Listing,
}

struct FetchState {
    path: String,
    generation: u64,
}

struct Inner {
    client: Arc<dyn ListingClient>,
    runtime: Handle,
    default_path: String,
    state: Mutex<FetchState>,
    listing: watch::Sender<Option<FetchedListing>>,
    in_flight: watch::Sender<usize>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, FetchState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn store(&self, generation: u64, path: &str, listing: Listing) {
        let state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                path = %path,
                current = %state.path,
                "discarding stale listing response"
            );
            return;
        }
        self.listing.send_replace(Some(FetchedListing {
            path: path.to_string(),
            listing,
        }));
        tracing::debug!(path = %path, "listing updated");
    }
}

/// Fetches and holds the listing for the current navigation path.
#[derive(Clone)]
pub struct ListingFetcher {
    inner: Arc<Inner>,
}

impl ListingFetcher {
    /// Creates a fetcher that spawns retrievals on `runtime`.
    pub fn new<C: ListingClient>(client: C, runtime: Handle) -> Self {
        Self::with_default_path(client, runtime, DEFAULT_PATH)
    }

    pub fn with_default_path<C: ListingClient>(
        client: C,
        runtime: Handle,
        default_path: impl Into<String>,
    ) -> Self {
        let default_path = default_path.into();
        let (listing, _) = watch::channel(None);
        let (in_flight, _) = watch::channel(0);
        Self {
            inner: Arc::new(Inner {
                client: Arc::new(client),
                runtime,
                state: Mutex::new(FetchState {
                    path: default_path.clone(),
                    generation: 0,
                }),
                default_path,
                listing,
                in_flight,
            }),
        }
    }

    /// Watches `nav`; fires immediately for its current path.
    pub fn bind(&self, nav: &NavigationState) -> SubscriptionId {
        let fetcher = self.clone();
        nav.watch(move |path| {
            // Detached: completion is observed through `subscribe`.
            let _ = fetcher.on_path_change(Some(path));
        })
    }

    /// Records the effective path for `raw` and issues one retrieval for it.
    ///
    /// The returned handle resolves once the response has been stored,
    /// discarded as stale, or logged as a failure.
    pub fn on_path_change(&self, raw: Option<&str>) -> JoinHandle<()> {
        let path = resolve_path_or(raw, &self.inner.default_path);
        let generation = {
            let mut state = self.inner.lock();
            state.generation += 1;
            state.path = path.clone();
            state.generation
        };
        tracing::debug!(path = %path, generation, "fetching listing");
        self.inner.in_flight.send_modify(|n| *n += 1);

        let inner = Arc::clone(&self.inner);
        self.inner.runtime.spawn(async move {
            let client = Arc::clone(&inner.client);
            let request_path = path.clone();
            let result = tokio::task::spawn_blocking(move || client.get(&request_path)).await;
            match result {
                Ok(Ok(listing)) => inner.store(generation, &path, listing),
                Ok(Err(e)) => tracing::warn!(path = %path, "listing fetch failed: {}", e),
                Err(e) => tracing::warn!(path = %path, "listing fetch task failed: {}", e),
            }
            inner.in_flight.send_modify(|n| *n = n.saturating_sub(1));
        })
    }

    /// Waits until no retrieval is in flight.
    pub async fn idle(&self) {
        let mut rx = self.inner.in_flight.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Effective path of the most recent change.
    pub fn path(&self) -> String {
        self.inner.lock().path.clone()
    }

    /// Last successfully fetched listing, if any.
    pub fn listing(&self) -> Option<Listing> {
        self.inner.listing.borrow().as_ref().map(|f| f.listing.clone())
    }

    /// Last successfully fetched listing together with its path.
    pub fn fetched(&self) -> Option<FetchedListing> {
        self.inner.listing.borrow().clone()
    }

    /// Receiver notified whenever the stored listing is replaced.
    pub fn subscribe(&self) -> watch::Receiver<Option<FetchedListing>> {
        self.inner.listing.subscribe()
    }
}
