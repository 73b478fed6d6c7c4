//! Observable navigation path.
//!
//! Watchers are called synchronously: once with the current value when they
//! are registered, then on every change. Setting the same value again is not a
//! change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Handle returned by [`NavigationState::watch`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Watcher = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Default)]
struct Inner {
    path: String,
    watchers: Vec<(SubscriptionId, Watcher)>,
}

/// Current navigation location plus its registered watchers.
#[derive(Default)]
pub struct NavigationState {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
}

impl NavigationState {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                path: initial.into(),
                watchers: Vec::new(),
            }),
            next_id: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Watchers run outside the lock.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current raw path (may be empty).
    pub fn path(&self) -> String {
        self.lock().path.clone()
    }

    /// Update the path and notify watchers if it changed. Returns whether it changed.
    pub fn set_path(&self, path: impl Into<String>) -> bool {
        let path = path.into();
        let watchers: Vec<Watcher> = {
            let mut inner = self.lock();
            if inner.path == path {
                return false;
            }
            inner.path = path.clone();
            inner.watchers.iter().map(|(_, w)| Arc::clone(w)).collect()
        };
        tracing::debug!(path = %path, watchers = watchers.len(), "navigation changed");
        for w in watchers {
            w(&path);
        }
        true
    }

    /// Register a watcher. It is invoked immediately with the current path.
    pub fn watch<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let watcher: Watcher = Arc::new(f);
        let current = {
            let mut inner = self.lock();
            inner.watchers.push((id, Arc::clone(&watcher)));
            inner.path.clone()
        };
        watcher(&current);
        id
    }

    /// Remove a watcher. Returns false if it was not registered.
    pub fn unwatch(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.watchers.len();
        inner.watchers.retain(|(wid, _)| *wid != id);
        inner.watchers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(nav: &NavigationState) -> (SubscriptionId, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = nav.watch(move |p| sink.lock().unwrap().push(p.to_string()));
        (id, seen)
    }

    #[test]
    fn watch_fires_immediately_with_current_value() {
        let nav = NavigationState::new("/photos/2020/");
        let (_, seen) = recorder(&nav);
        assert_eq!(*seen.lock().unwrap(), vec!["/photos/2020/".to_string()]);
    }

    #[test]
    fn set_path_notifies_on_change_only() {
        let nav = NavigationState::default();
        let (_, seen) = recorder(&nav);
        assert!(nav.set_path("/photos/a/"));
        assert!(!nav.set_path("/photos/a/"));
        assert!(nav.set_path(""));
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["".to_string(), "/photos/a/".to_string(), "".to_string()]
        );
        assert_eq!(nav.path(), "");
    }

    #[test]
    fn unwatch_stops_notifications() {
        let nav = NavigationState::new("/");
        let (id, seen) = recorder(&nav);
        assert!(nav.unwatch(id));
        assert!(!nav.unwatch(id));
        nav.set_path("/x/");
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn watcher_may_read_state_reentrantly() {
        let nav = Arc::new(NavigationState::new("/a/"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (nav2, sink) = (Arc::clone(&nav), Arc::clone(&seen));
        nav.watch(move |p| {
            assert_eq!(nav2.path(), p);
            sink.lock().unwrap().push(p.to_string());
        });
        nav.set_path("/b/");
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
