//! Domain types for the fuel price server.
//!
//! Stations, prices and the values used to query them. Types that take
//! client input enforce their invariants at construction, so code that
//! receives them can trust their validity.

mod error;
mod fuel;
mod geo;
mod station;

pub use error::DomainError;
pub use fuel::{FuelType, FuelTypeFilter};
pub use geo::{Coordinate, EARTH_RADIUS_M, distance, parse_radius};
pub use station::{FuelTypePrice, Station, StationWithPrices};
