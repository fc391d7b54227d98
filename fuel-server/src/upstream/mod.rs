//! NSW FuelCheck API client.
//!
//! This module provides an HTTP client for the FuelCheck price API and the
//! [`PriceSource`] seam the cache pulls data through.
//!
//! Key characteristics of FuelCheck:
//! - Every data request needs a bearer token from an OAuth
//!   client-credentials exchange, plus `apikey`, `transactionid` and
//!   `requesttimestamp` headers
//! - `/fuel/prices` returns the whole state; `/fuel/prices/new` returns only
//!   rows changed since the caller's previous request
//! - Station codes are numeric but sent as either numbers or strings

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{UpstreamClient, UpstreamConfig};
pub use convert::{PriceUpdate, convert_prices_response};
pub use error::UpstreamError;
pub use mock::MockPriceSource;
pub use source::PriceSource;
pub use types::{AccessTokenResponse, LocationDto, PriceDto, PricesResponse, StationDto};
