//! Mock price source for running without API access.
//!
//! Serves a saved FuelCheck payload (e.g. a `prices.json` captured from the
//! full endpoint) as the full snapshot, and scripted responses for
//! incremental fetches.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, Notify};

use super::convert::{PriceUpdate, convert_prices_response};
use super::error::UpstreamError;
use super::source::PriceSource;
use super::types::PricesResponse;

/// Mock source that serves a fixed snapshot.
///
/// Incremental fetches pop scripted results in order; once the script is
/// exhausted they return an empty update, as the live endpoint does when
/// nothing has changed.
pub struct MockPriceSource {
    full: PriceUpdate,
    incremental: Mutex<VecDeque<Result<PriceUpdate, UpstreamError>>>,
    gate: Option<Arc<Notify>>,
    calls: AtomicU64,
}

impl MockPriceSource {
    /// Create a mock serving the given full snapshot.
    pub fn new(full: PriceUpdate) -> Self {
        Self {
            full,
            incremental: Mutex::new(VecDeque::new()),
            gate: None,
            calls: AtomicU64::new(0),
        }
    }

    /// Load the full snapshot from a FuelCheck JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, UpstreamError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let response: PricesResponse =
            serde_json::from_str(&json).map_err(|e| UpstreamError::json(&e, &json))?;

        Ok(Self::new(convert_prices_response(response)))
    }

    /// Queue a result for the next incremental fetch.
    pub fn with_incremental(mut self, result: Result<PriceUpdate, UpstreamError>) -> Self {
        self.incremental.get_mut().push_back(result);
        self
    }

    /// Make every incremental fetch wait for a permit on `gate` before
    /// answering.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }
}

impl PriceSource for MockPriceSource {
    async fn fetch_full(&self) -> Result<PriceUpdate, UpstreamError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.full.clone())
    }

    async fn fetch_incremental(&self) -> Result<PriceUpdate, UpstreamError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        self.incremental
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(PriceUpdate::default()))
    }

    fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}
