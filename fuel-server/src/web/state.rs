//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::PriceCache;

/// Shared application state.
///
/// Contains everything needed to handle requests.
pub struct AppState<S> {
    /// The refreshing price cache
    pub cache: Arc<PriceCache<S>>,

    /// Whether `/data` and `/stats` are served
    pub diagnostics: bool,
}

impl<S> AppState<S> {
    /// Create a new app state.
    pub fn new(cache: Arc<PriceCache<S>>, diagnostics: bool) -> Self {
        Self { cache, diagnostics }
    }
}

// Manual impl: deriving would require `S: Clone`.
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            diagnostics: self.diagnostics,
        }
    }
}
