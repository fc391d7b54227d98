//! Cache error types.

use crate::upstream::UpstreamError;

/// Errors returned by cache queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// No station with this code is cached
    #[error("station {code} not found")]
    NotFound { code: String },
}

/// Errors from building the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Startup bulk load failed under [`StartupPolicy::FailFast`](super::StartupPolicy::FailFast)
    #[error("initial price load failed: {0}")]
    InitialLoad(#[source] UpstreamError),
}
