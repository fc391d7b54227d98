//! The data-supplier seam used by the price cache.

use std::future::Future;

use super::convert::PriceUpdate;
use super::error::UpstreamError;

/// Trait for providing station/price payloads.
///
/// This abstraction allows the cache to be driven by the live API, an
/// offline snapshot, or scripted responses in tests.
pub trait PriceSource: Send + Sync + 'static {
    /// Fetch every station and price.
    fn fetch_full(&self) -> impl Future<Output = Result<PriceUpdate, UpstreamError>> + Send;

    /// Fetch stations and prices changed since the previous fetch.
    fn fetch_incremental(
        &self,
    ) -> impl Future<Output = Result<PriceUpdate, UpstreamError>> + Send;

    /// Number of upstream calls made so far, for monitoring.
    fn call_count(&self) -> u64;
}
