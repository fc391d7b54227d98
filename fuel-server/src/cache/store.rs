//! The in-memory station and price snapshot.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{FuelType, FuelTypePrice, Station};
use crate::upstream::PriceUpdate;

/// Counts reported by a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStats {
    pub stations_updated: usize,
    pub stations_added: usize,
    pub prices_updated: usize,
    pub prices_added: usize,
}

/// Authoritative snapshot of stations and prices.
///
/// Stations are unique by `code`; prices are unique by
/// `(station_code, fuel_type)`. Both collections keep insertion order, and
/// a merged replacement keeps the position of the row it replaces.
#[derive(Debug, Clone, Default)]
pub struct PriceStore {
    stations: Vec<Station>,
    prices: Vec<FuelTypePrice>,

    /// Station code → index into `stations`.
    station_index: HashMap<String, usize>,

    /// (station code, fuel type) → index into `prices`.
    price_index: HashMap<(String, FuelType), usize>,
}

impl PriceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a full payload.
    ///
    /// Duplicate keys in the payload collapse to the last occurrence, at the
    /// position of the first.
    pub fn from_update(update: PriceUpdate) -> Self {
        let mut store = Self::new();
        store.merge(update);
        store
    }

    /// Merge an update into the store.
    ///
    /// Each incoming station replaces the station with the same code in
    /// place, or is appended. Each incoming price replaces the row with the
    /// same `(station_code, fuel_type)` in place, or is appended. Applying
    /// the same update twice leaves the store as applying it once.
    pub fn merge(&mut self, update: PriceUpdate) -> MergeStats {
        let mut stats = MergeStats::default();

        for station in update.stations {
            match self.station_index.get(&station.code) {
                Some(&idx) => {
                    self.stations[idx] = station;
                    stats.stations_updated += 1;
                }
                None => {
                    self.station_index
                        .insert(station.code.clone(), self.stations.len());
                    self.stations.push(station);
                    stats.stations_added += 1;
                }
            }
        }

        for price in update.prices {
            let key = (price.station_code.clone(), price.fuel_type.clone());
            match self.price_index.get(&key) {
                Some(&idx) => {
                    self.prices[idx] = price;
                    stats.prices_updated += 1;
                }
                None => {
                    self.price_index.insert(key, self.prices.len());
                    self.prices.push(price);
                    stats.prices_added += 1;
                }
            }
        }

        stats
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn prices(&self) -> &[FuelTypePrice] {
        &self.prices
    }

    /// Look up a station by code.
    pub fn station(&self, code: &str) -> Option<&Station> {
        self.station_index.get(code).map(|&idx| &self.stations[idx])
    }

    /// Look up the price of one fuel type at one station.
    #[cfg(test)]
    pub fn price(&self, code: &str, fuel_type: &FuelType) -> Option<&FuelTypePrice> {
        self.price_index
            .get(&(code.to_string(), fuel_type.clone()))
            .map(|&idx| &self.prices[idx])
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn price_count(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.prices.is_empty()
    }
}

impl PartialEq for PriceStore {
    /// Stores are equal when their ordered contents are; the indexes are
    /// derived from those.
    fn eq(&self, other: &Self) -> bool {
        self.stations == other.stations && self.prices == other.prices
    }
}
