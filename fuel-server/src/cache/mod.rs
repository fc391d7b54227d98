//! Refreshing price cache.
//!
//! Holds the authoritative [`PriceStore`] and refreshes it lazily: every
//! query first checks whether the data is older than the refresh interval
//! and, if so, pulls an incremental update before reading.
//!
//! Two locks are involved:
//! - the store lock guards the snapshot; queries and merges are mutually
//!   exclusive, so a reader never sees a half-applied update;
//! - the refresh gate serializes refreshes and owns the last refresh time.
//!   The upstream fetch runs under the gate only, so a slow fetch does not
//!   block the store, while queries that need fresh data still wait for it.
//!
//! Refresh failures are logged and swallowed; queries then serve whatever
//! the store last held.

mod config;
mod error;
mod query;
mod store;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{Coordinate, FuelTypeFilter, FuelTypePrice, Station, StationWithPrices};
use crate::upstream::PriceSource;

pub use config::{CacheConfig, StartupPolicy};
pub use error::{CacheError, QueryError};
pub use store::{MergeStats, PriceStore};

/// Result of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Data was within the refresh interval; nothing fetched.
    Fresh,

    /// An incremental update was fetched and merged.
    Refreshed(MergeStats),

    /// The fetch failed; stale data is kept and the next check retries.
    Failed,
}

/// Cache counters for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub stations: usize,
    pub prices: usize,
    pub query_calls: u64,
    pub upstream_calls: u64,

    /// Seconds since the last successful refresh, if known.
    pub secs_since_refresh: Option<u64>,

    pub refresh_in_progress: bool,
}

struct RefreshState {
    /// `None` until the first successful load or refresh.
    last_refresh: Option<Instant>,
}

impl RefreshState {
    fn is_stale(&self, now: Instant, interval: Duration) -> bool {
        match self.last_refresh {
            Some(last) => now.duration_since(last) >= interval,
            None => true,
        }
    }
}

/// Thread-safe, lazily refreshed price cache.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct PriceCache<S> {
    source: S,
    store: Mutex<PriceStore>,
    refresh: Mutex<RefreshState>,
    refresh_interval: Duration,
    queries: AtomicU64,
}

impl<S: PriceSource> PriceCache<S> {
    /// Create an empty cache. The first query triggers a refresh.
    pub fn new(source: S, config: &CacheConfig) -> Self {
        Self {
            source,
            store: Mutex::new(PriceStore::new()),
            refresh: Mutex::new(RefreshState { last_refresh: None }),
            refresh_interval: config.refresh_interval,
            queries: AtomicU64::new(0),
        }
    }

    /// Create a cache and bulk-load it from the source's full snapshot.
    ///
    /// If the load fails, [`StartupPolicy::ServeEmpty`] returns an empty
    /// cache that will retry on the first query, while
    /// [`StartupPolicy::FailFast`] returns the error.
    pub async fn load(source: S, config: &CacheConfig) -> Result<Self, CacheError> {
        let cache = Self::new(source, config);

        match cache.source.fetch_full().await {
            Ok(update) => {
                let stats = cache.store.lock().await.merge(update);
                cache.refresh.lock().await.last_refresh = Some(Instant::now());
                info!(
                    stations = stats.stations_added,
                    prices = stats.prices_added,
                    "loaded initial price data"
                );
            }
            Err(e) => match config.startup_policy {
                StartupPolicy::ServeEmpty => {
                    warn!(error = %e, "initial price load failed, serving empty cache");
                }
                StartupPolicy::FailFast => return Err(CacheError::InitialLoad(e)),
            },
        }

        Ok(cache)
    }

    /// Refresh from upstream if the data is stale.
    ///
    /// Concurrent callers queue on the refresh gate; whoever gets it second
    /// sees the first caller's refresh and does nothing. On failure the last
    /// refresh time is left alone so the next call tries again immediately.
    pub async fn maybe_refresh(&self) -> RefreshOutcome {
        let mut state = self.refresh.lock().await;

        if !state.is_stale(Instant::now(), self.refresh_interval) {
            return RefreshOutcome::Fresh;
        }

        debug!("price data is stale, fetching update");

        let update = match self.source.fetch_incremental().await {
            Ok(update) => update,
            Err(e) => {
                warn!(error = %e, "price refresh failed, serving stale data");
                return RefreshOutcome::Failed;
            }
        };

        let stats = self.store.lock().await.merge(update);
        state.last_refresh = Some(Instant::now());

        info!(
            stations_updated = stats.stations_updated,
            stations_added = stats.stations_added,
            prices_updated = stats.prices_updated,
            prices_added = stats.prices_added,
            upstream_calls = self.source.call_count(),
            "fuel data updated"
        );

        RefreshOutcome::Refreshed(stats)
    }

    /// Refresh if needed, then lock the store for reading.
    async fn read_fresh(&self) -> MutexGuard<'_, PriceStore> {
        self.maybe_refresh().await;

        let calls = self.queries.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(query_calls = calls, "serving query");

        self.store.lock().await
    }

    /// Stations within `radius_m` meters of `center`.
    pub async fn stations_within_radius(
        &self,
        center: Coordinate,
        radius_m: f64,
    ) -> Vec<Station> {
        let store = self.read_fresh().await;
        query::stations_within_radius(&store, center, radius_m)
    }

    /// All price rows for a station. Unknown codes yield an empty list.
    pub async fn prices_for_station(&self, code: &str) -> Vec<FuelTypePrice> {
        let store = self.read_fresh().await;
        query::prices_for_station(&store, code)
    }

    /// A station and all of its prices.
    pub async fn station_prices(&self, code: &str) -> Result<StationWithPrices, QueryError> {
        let store = self.read_fresh().await;
        query::station_prices(&store, code).ok_or_else(|| QueryError::NotFound {
            code: code.to_string(),
        })
    }

    /// Stations within the radius selling any of `fuel_types`.
    ///
    /// With several fuel types, stations selling the first one come first,
    /// cheapest first, and the rest follow in store order. With one fuel
    /// type all results are sorted cheapest first.
    pub async fn query_radius(
        &self,
        center: Coordinate,
        radius_m: f64,
        fuel_types: &FuelTypeFilter,
    ) -> Vec<StationWithPrices> {
        let store = self.read_fresh().await;
        query::query_radius(&store, center, radius_m, fuel_types)
    }

    /// Copy of the whole store, for diagnostics. Does not refresh.
    pub async fn snapshot(&self) -> PriceStore {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.store.lock().await.clone()
    }

    /// Current counters. Does not wait for an in-flight refresh.
    pub async fn stats(&self) -> CacheStats {
        let (stations, prices) = {
            let store = self.store.lock().await;
            (store.station_count(), store.price_count())
        };

        let (secs_since_refresh, refresh_in_progress) = match self.refresh.try_lock() {
            Ok(state) => (state.last_refresh.map(|t| t.elapsed().as_secs()), false),
            Err(_) => (None, true),
        };

        CacheStats {
            stations,
            prices,
            query_calls: self.queries.load(Ordering::Relaxed),
            upstream_calls: self.source.call_count(),
            secs_since_refresh,
            refresh_in_progress,
        }
    }

    /// The underlying data source.
    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }
}
