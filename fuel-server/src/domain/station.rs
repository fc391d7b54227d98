//! Stations and their fuel prices.

use serde::Serialize;

use super::{Coordinate, FuelType};

/// A single fuel retail location.
///
/// `code` is the stable identifier used to join prices to stations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub brand_id: String,
    pub station_id: String,
    pub brand: String,
    pub code: String,
    pub name: String,
    pub address: String,
    pub location: Coordinate,
    pub is_ad_blue_available: bool,
}

/// Price of one fuel type at one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelTypePrice {
    /// Code of the station selling this fuel.
    pub station_code: String,

    pub fuel_type: FuelType,

    /// Price in upstream currency units (cents per litre for NSW).
    pub price: f64,

    /// Upstream timestamp, kept verbatim.
    pub last_updated: String,
}

impl FuelTypePrice {
    /// The `(station code, fuel type)` pair identifying this row.
    pub fn key(&self) -> (&str, &FuelType) {
        (&self.station_code, &self.fuel_type)
    }
}

/// A station together with its (possibly filtered) price rows.
///
/// Built on demand by queries; never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationWithPrices {
    pub station: Station,
    pub prices: Vec<FuelTypePrice>,
}

impl StationWithPrices {
    /// Price of the given fuel type at this station, if sold.
    pub fn price_of(&self, fuel_type: &FuelType) -> Option<f64> {
        self.prices
            .iter()
            .find(|p| &p.fuel_type == fuel_type)
            .map(|p| p.price)
    }
}
