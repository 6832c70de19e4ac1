//! Key-based query cache with stale-while-revalidate semantics.
//!
//! Every key (a request URL) owns one [`CacheSnapshot`]. A revalidation keeps
//! the current snapshot readable, flips `is_validating`, and settles the entry
//! when the fetch resolves. Subscribers are plain callbacks so the cache works
//! without a reactive runtime; the Leptos hooks bridge it into signals.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use chrono::Utc;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use serde_json::Value;

use crate::domain::errors::FetchError;
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_trace, log_warn};

/// Source of raw JSON payloads for a cache key.
pub trait Fetcher {
    fn fetch(&self, key: &str) -> LocalBoxFuture<'static, Result<Value, FetchError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Minimum gap between two revalidation starts of one key.
    pub dedupe_interval_ms: i64,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self { dedupe_interval_ms: 2_000 }
    }
}

/// What a subscriber sees for one key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    pub data: Option<Rc<Value>>,
    pub error: Option<FetchError>,
    pub is_validating: bool,
}

type Callback = Rc<dyn Fn(&CacheSnapshot)>;

#[derive(Default)]
struct Entry {
    snapshot: CacheSnapshot,
    last_started_ms: Option<i64>,
    subscribers: Vec<(u64, Callback)>,
}

impl Entry {
    fn callbacks(&self) -> Vec<Callback> {
        self.subscribers.iter().map(|(_, cb)| Rc::clone(cb)).collect()
    }
}

struct Inner {
    fetcher: Rc<dyn Fetcher>,
    options: CacheOptions,
    clock: Rc<dyn Fn() -> i64>,
    entries: HashMap<String, Entry>,
    next_subscriber: u64,
}

/// Shared handle; clones point at the same cache.
#[derive(Clone)]
pub struct QueryCache {
    inner: Rc<RefCell<Inner>>,
}

/// Keeps a callback registered until dropped.
pub struct Subscription {
    cache: Weak<RefCell<Inner>>,
    key: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.cache.upgrade() else {
            return;
        };
        // a callback may drop its own subscription while the cache is busy
        let Ok(mut inner) = inner.try_borrow_mut() else {
            return;
        };
        if let Some(entry) = inner.entries.get_mut(&self.key) {
            entry.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

fn notify(callbacks: &[Callback], snapshot: &CacheSnapshot) {
    for callback in callbacks {
        callback(snapshot);
    }
}

fn spawn(future: LocalBoxFuture<'static, ()>) {
    #[cfg(target_arch = "wasm32")]
    wasm_bindgen_futures::spawn_local(future);
    #[cfg(not(target_arch = "wasm32"))]
    futures::executor::block_on(future);
}

impl QueryCache {
    pub fn new(fetcher: Rc<dyn Fetcher>, options: CacheOptions) -> Self {
        Self::with_clock(fetcher, options, Rc::new(|| Utc::now().timestamp_millis()))
    }

    /// Cache driven by an explicit millisecond clock.
    pub fn with_clock(fetcher: Rc<dyn Fetcher>, options: CacheOptions, clock: Rc<dyn Fn() -> i64>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                fetcher,
                options,
                clock,
                entries: HashMap::new(),
                next_subscriber: 0,
            })),
        }
    }

    pub fn snapshot(&self, key: &str) -> CacheSnapshot {
        self.inner.borrow().entries.get(key).map(|e| e.snapshot.clone()).unwrap_or_default()
    }

    pub fn subscribe(&self, key: &str, callback: impl Fn(&CacheSnapshot) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.entries.entry(key.to_string()).or_default().subscribers.push((id, Rc::new(callback)));
        log_trace!(LogComponent::Infrastructure("QueryCache"), "subscriber {} on {}", id, key);

        Subscription { cache: Rc::downgrade(&self.inner), key: key.to_string(), id }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self, key: &str) -> usize {
        self.inner.borrow().entries.get(key).map_or(0, |e| e.subscribers.len())
    }

    /// Start a background revalidation of `key` unless one is deduplicated.
    pub fn revalidate(&self, key: &str) {
        if let Some(task) = self.begin_revalidation(key) {
            spawn(task);
        }
    }

    /// Keys that still have at least one subscriber.
    pub fn active_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|(_, entry)| !entry.subscribers.is_empty())
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    /// Revalidate every key that still has subscribers.
    pub fn revalidate_active(&self) {
        for key in self.active_keys() {
            self.revalidate(&key);
        }
    }

    /// Mark `key` as validating and hand back the task that settles it.
    ///
    /// Returns `None` while a fetch for the key is in flight or when the
    /// previous one started less than `dedupe_interval_ms` ago.
    pub fn begin_revalidation(&self, key: &str) -> Option<LocalBoxFuture<'static, ()>> {
        let (fetcher, snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let now = (inner.clock)();
            let dedupe = inner.options.dedupe_interval_ms;
            let fetcher = Rc::clone(&inner.fetcher);
            let entry = inner.entries.entry(key.to_string()).or_default();

            if entry.snapshot.is_validating {
                log_trace!(LogComponent::Infrastructure("QueryCache"), "in flight: {}", key);
                return None;
            }
            if entry.last_started_ms.is_some_and(|started| now - started < dedupe) {
                log_trace!(LogComponent::Infrastructure("QueryCache"), "deduped: {}", key);
                return None;
            }

            entry.last_started_ms = Some(now);
            entry.snapshot.is_validating = true;
            (fetcher, entry.snapshot.clone(), entry.callbacks())
        };

        log_debug!(LogComponent::Infrastructure("QueryCache"), "revalidating {}", key);
        notify(&callbacks, &snapshot);

        let request = fetcher.fetch(key);
        let cache = Rc::downgrade(&self.inner);
        let key = key.to_string();
        Some(
            async move {
                let result = request.await;
                if let Some(inner) = cache.upgrade() {
                    QueryCache { inner }.settle(&key, result);
                }
            }
            .boxed_local(),
        )
    }

    fn settle(&self, key: &str, result: Result<Value, FetchError>) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let Some(entry) = inner.entries.get_mut(key) else {
                return;
            };
            entry.snapshot.is_validating = false;
            match result {
                Ok(value) => {
                    entry.snapshot.data = Some(Rc::new(value));
                    entry.snapshot.error = None;
                }
                Err(err) => {
                    log_warn!(LogComponent::Infrastructure("QueryCache"), "{} failed: {}", key, err);
                    entry.snapshot.data = None;
                    entry.snapshot.error = Some(err);
                }
            }
            (entry.snapshot.clone(), entry.callbacks())
        };
        notify(&callbacks, &snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::LocalPool;
    use serde_json::json;
    use std::cell::Cell;

    #[derive(Default)]
    struct PendingFetcher {
        requests: RefCell<Vec<(String, oneshot::Sender<Result<Value, FetchError>>)>>,
    }

    impl PendingFetcher {
        fn calls(&self) -> usize {
            self.requests.borrow().len()
        }

        fn respond(&self, index: usize, result: Result<Value, FetchError>) {
            let (_, tx) = self.requests.borrow_mut().remove(index);
            tx.send(result).unwrap();
        }
    }

    impl Fetcher for PendingFetcher {
        fn fetch(&self, key: &str) -> LocalBoxFuture<'static, Result<Value, FetchError>> {
            let (tx, rx) = oneshot::channel();
            self.requests.borrow_mut().push((key.to_string(), tx));
            async move { rx.await.unwrap_or_else(|_| Err(FetchError::Network("cancelled".into()))) }
                .boxed_local()
        }
    }

    fn cache_at(fetcher: Rc<PendingFetcher>, now: Rc<Cell<i64>>) -> QueryCache {
        QueryCache::with_clock(fetcher, CacheOptions::default(), Rc::new(move || now.get()))
    }

    #[test]
    fn in_flight_requests_are_shared() {
        let fetcher = Rc::new(PendingFetcher::default());
        let cache = cache_at(fetcher.clone(), Rc::new(Cell::new(0)));

        let task = cache.begin_revalidation("k").expect("first revalidation starts");
        assert!(cache.begin_revalidation("k").is_none());
        assert!(cache.snapshot("k").is_validating);
        assert_eq!(fetcher.calls(), 1);

        fetcher.respond(0, Ok(json!({ "price": 1 })));
        LocalPool::new().run_until(task);

        let snapshot = cache.snapshot("k");
        assert!(!snapshot.is_validating);
        assert_eq!(snapshot.data.as_deref(), Some(&json!({ "price": 1 })));
    }

    #[test]
    fn dedupe_interval_blocks_quick_refetch() {
        let fetcher = Rc::new(PendingFetcher::default());
        let now = Rc::new(Cell::new(10_000));
        let cache = cache_at(fetcher.clone(), now.clone());

        let task = cache.begin_revalidation("k").unwrap();
        fetcher.respond(0, Ok(json!(1)));
        LocalPool::new().run_until(task);

        now.set(11_999);
        assert!(cache.begin_revalidation("k").is_none());
        now.set(12_000);
        assert!(cache.begin_revalidation("k").is_some());
    }

    #[test]
    fn error_clears_previous_data() {
        let fetcher = Rc::new(PendingFetcher::default());
        let now = Rc::new(Cell::new(0));
        let cache = cache_at(fetcher.clone(), now.clone());
        let mut pool = LocalPool::new();

        let task = cache.begin_revalidation("k").unwrap();
        fetcher.respond(0, Ok(json!(1)));
        pool.run_until(task);

        now.set(5_000);
        let task = cache.begin_revalidation("k").unwrap();
        // stale data stays readable while revalidating
        assert!(cache.snapshot("k").data.is_some());
        fetcher.respond(0, Err(FetchError::MissingData));
        pool.run_until(task);

        let snapshot = cache.snapshot("k");
        assert_eq!(snapshot.data, None);
        assert_eq!(snapshot.error, Some(FetchError::MissingData));
    }

    #[test]
    fn dropped_subscription_is_not_notified() {
        let fetcher = Rc::new(PendingFetcher::default());
        let cache = cache_at(fetcher.clone(), Rc::new(Cell::new(0)));
        let seen = Rc::new(Cell::new(0));

        let counter = seen.clone();
        let subscription = cache.subscribe("old", move |_| counter.set(counter.get() + 1));
        let task = cache.begin_revalidation("old").unwrap();
        assert_eq!(seen.get(), 1);

        drop(subscription);
        assert_eq!(cache.subscriber_count("old"), 0);
        fetcher.respond(0, Ok(json!("late")));
        LocalPool::new().run_until(task);

        assert_eq!(seen.get(), 1);
        // the late response is still cached under its own key
        assert!(cache.snapshot("old").data.is_some());
    }

    #[test]
    fn subscribers_see_validating_then_settled() {
        let fetcher = Rc::new(PendingFetcher::default());
        let cache = cache_at(fetcher.clone(), Rc::new(Cell::new(0)));
        let states = Rc::new(RefCell::new(Vec::new()));

        let log = states.clone();
        let _subscription = cache.subscribe("k", move |s| log.borrow_mut().push(s.is_validating));
        let task = cache.begin_revalidation("k").unwrap();
        fetcher.respond(0, Ok(json!(null)));
        LocalPool::new().run_until(task);

        assert_eq!(*states.borrow(), vec![true, false]);
    }

    #[test]
    fn only_observed_keys_are_active() {
        let fetcher = Rc::new(PendingFetcher::default());
        let cache = cache_at(fetcher, Rc::new(Cell::new(0)));
        let _watching = cache.subscribe("watched", |_| {});
        drop(cache.subscribe("abandoned", |_| {}));

        assert_eq!(cache.active_keys(), vec!["watched".to_string()]);
    }
}
