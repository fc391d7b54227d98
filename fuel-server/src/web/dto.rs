//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::cache::PriceStore;
use crate::domain::{Coordinate, DomainError, FuelTypePrice, Station, parse_radius};

/// Query string for radius searches.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RadiusRequest {
    /// Latitude of the search center
    pub latitude: f64,

    /// Longitude of the search center
    pub longitude: f64,

    /// Search radius in meters
    pub radius: f64,
}

impl RadiusRequest {
    /// Validate the center and radius.
    pub fn parse(&self) -> Result<(Coordinate, f64), DomainError> {
        let center = Coordinate::parse(self.latitude, self.longitude)?;
        let radius = parse_radius(self.radius)?;
        Ok((center, radius))
    }
}

/// Query string for radius searches filtered by fuel type.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSearchRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,

    /// Comma-separated fuel types in priority order, e.g. `E10,U91`
    pub fuel_types: Option<String>,
}

impl PriceSearchRequest {
    /// The center and radius part of the request.
    pub fn area(&self) -> RadiusRequest {
        RadiusRequest {
            latitude: self.latitude,
            longitude: self.longitude,
            radius: self.radius,
        }
    }
}

/// A station in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    pub code: String,
    pub brand_id: String,
    pub station_id: String,
    pub brand: String,
    pub name: String,
    pub address: String,
    pub location: Coordinate,
    pub is_ad_blue_available: bool,
}

impl From<&Station> for StationResult {
    fn from(s: &Station) -> Self {
        Self {
            code: s.code.clone(),
            brand_id: s.brand_id.clone(),
            station_id: s.station_id.clone(),
            brand: s.brand.clone(),
            name: s.name.clone(),
            address: s.address.clone(),
            location: s.location,
            is_ad_blue_available: s.is_ad_blue_available,
        }
    }
}

/// A price row in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResult {
    pub station_code: String,
    pub fuel_type: String,
    pub price: f64,
    pub last_updated: String,
}

impl From<&FuelTypePrice> for PriceResult {
    fn from(p: &FuelTypePrice) -> Self {
        Self {
            station_code: p.station_code.clone(),
            fuel_type: p.fuel_type.to_string(),
            price: p.price,
            last_updated: p.last_updated.clone(),
        }
    }
}

/// A station with its prices.
#[derive(Debug, Serialize)]
pub struct StationPricesResult {
    pub station: StationResult,
    pub prices: Vec<PriceResult>,
}

impl StationPricesResult {
    pub fn new(station: &Station, prices: &[FuelTypePrice]) -> Self {
        Self {
            station: station.into(),
            prices: prices.iter().map(PriceResult::from).collect(),
        }
    }
}

/// Full dump of the cached data.
#[derive(Debug, Serialize)]
pub struct DataResponse {
    pub stations: Vec<StationResult>,
    pub prices: Vec<PriceResult>,
}

impl From<&PriceStore> for DataResponse {
    fn from(store: &PriceStore) -> Self {
        Self {
            stations: store.stations().iter().map(StationResult::from).collect(),
            prices: store.prices().iter().map(PriceResult::from).collect(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
