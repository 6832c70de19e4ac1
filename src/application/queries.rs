//! Reactive data hooks over the query cache.
//!
//! A hook derives its cache key from signals, subscribes to that key and
//! revalidates it. When the key changes the old subscription is dropped first,
//! so a late response for the old key cannot reach the hook.

use leptos::*;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::errors::FetchError;
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{Asset, AssetMetrics, AssetOption, PriceSeries, TimeSeries, TimeSeriesQuery};
use crate::infrastructure::cache::{CacheSnapshot, QueryCache, Subscription};
use crate::infrastructure::http::MessariEndpoints;
use crate::{log_error, log_trace};

/// `{data, error, is_validating}` of one query
pub struct QueryState<T: 'static> {
    pub data: Signal<Option<T>>,
    pub error: Signal<Option<FetchError>>,
    pub is_validating: Signal<bool>,
}

impl<T: 'static> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for QueryState<T> {}

impl<T: Clone + 'static> QueryState<T> {
    /// Data is present and no error is outstanding.
    pub fn is_loaded(&self) -> Signal<bool> {
        let (data, error) = (self.data, self.error);
        Signal::derive(move || error.with(Option::is_none) && data.with(Option::is_some))
    }
}

/// Decode a cached payload into `T`.
pub fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, FetchError> {
    T::deserialize(value).map_err(FetchError::from)
}

/// Subscribe to the key produced by `key`; `None` means "nothing to fetch".
pub fn use_query<T>(cache: &QueryCache, key: impl Fn() -> Option<String> + 'static) -> QueryState<T>
where
    T: DeserializeOwned + Clone + PartialEq + 'static,
{
    let snapshot = create_rw_signal(CacheSnapshot::default());
    let subscription = store_value::<Option<Subscription>>(None);
    let cache = cache.clone();

    create_effect(move |_| {
        subscription.set_value(None);
        let Some(key) = key() else {
            snapshot.set(CacheSnapshot::default());
            return;
        };
        log_trace!(LogComponent::Application("Queries"), "watching {}", key);

        snapshot.set(cache.snapshot(&key));
        let watcher = cache.subscribe(&key, move |latest| snapshot.set(latest.clone()));
        subscription.set_value(Some(watcher));
        cache.revalidate(&key);
    });
    on_cleanup(move || subscription.set_value(None));

    let decoded = create_memo(move |_| {
        snapshot.with(|s| {
            s.data.as_deref().map(|value| {
                decode::<T>(value).inspect_err(|err| {
                    log_error!(LogComponent::Application("Queries"), "unexpected payload shape: {}", err);
                })
            })
        })
    });

    QueryState {
        data: Signal::derive(move || decoded.get().and_then(Result::ok)),
        error: Signal::derive(move || {
            snapshot
                .with(|s| s.error.clone())
                .or_else(|| decoded.get().and_then(Result::err))
        }),
        is_validating: Signal::derive(move || snapshot.with(|s| s.is_validating)),
    }
}

pub fn use_asset_list(cache: &QueryCache, endpoints: &MessariEndpoints) -> QueryState<Vec<Asset>> {
    let url = endpoints.assets_url();
    use_query(cache, move || Some(url.clone()))
}

pub fn use_asset_metrics(
    cache: &QueryCache,
    endpoints: &MessariEndpoints,
    asset: Signal<AssetOption>,
) -> QueryState<AssetMetrics> {
    let endpoints = endpoints.clone();
    use_query(cache, move || {
        let slug = asset.with(AssetOption::slug);
        (!slug.value().is_empty()).then(|| endpoints.metrics_url(&slug))
    })
}

pub fn use_time_series(
    cache: &QueryCache,
    endpoints: &MessariEndpoints,
    query: Signal<TimeSeriesQuery>,
) -> QueryState<TimeSeries> {
    let endpoints = endpoints.clone();
    use_query(cache, move || {
        query.with(|q| (!q.asset.value().is_empty()).then(|| endpoints.time_series_url(q)))
    })
}

/// Normalized series of a time-series query, empty until loaded.
pub fn series_of(state: QueryState<TimeSeries>) -> Memo<PriceSeries> {
    create_memo(move |_| state.data.get().map(TimeSeries::into_series).unwrap_or_default())
}
