//! Radius and fuel-type queries over a [`PriceStore`].
//!
//! These functions are pure reads; the caller is responsible for holding
//! the store lock so the snapshot is stable for the duration of a query.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::domain::{
    Coordinate, FuelType, FuelTypeFilter, FuelTypePrice, Station, StationWithPrices, distance,
};

use super::store::PriceStore;

/// Stations no farther than `radius_m` meters from `center`, in store order.
pub fn stations_within_radius(
    store: &PriceStore,
    center: Coordinate,
    radius_m: f64,
) -> Vec<Station> {
    store
        .stations()
        .iter()
        .filter(|s| distance(center, s.location) <= radius_m)
        .cloned()
        .collect()
}

/// All price rows for a station, in store order.
pub fn prices_for_station(store: &PriceStore, code: &str) -> Vec<FuelTypePrice> {
    store
        .prices()
        .iter()
        .filter(|p| p.station_code == code)
        .cloned()
        .collect()
}

/// A station and all of its prices, or `None` if the code is unknown.
pub fn station_prices(store: &PriceStore, code: &str) -> Option<StationWithPrices> {
    let station = store.station(code)?.clone();
    let prices = prices_for_station(store, code);
    Some(StationWithPrices { station, prices })
}

/// Stations within the radius selling at least one requested fuel type,
/// with their prices narrowed to the requested types.
///
/// Ordering is keyed on the filter's primary type:
/// - with several requested types, stations selling the primary type come
///   first, cheapest first, followed by the remaining stations in store
///   order;
/// - with a single requested type, every result sells it and all are sorted
///   cheapest first.
///
/// Sorting is stable, so stations with equal prices keep store order.
pub fn query_radius(
    store: &PriceStore,
    center: Coordinate,
    radius_m: f64,
    fuel_types: &FuelTypeFilter,
) -> Vec<StationWithPrices> {
    let nearby: Vec<&Station> = store
        .stations()
        .iter()
        .filter(|s| distance(center, s.location) <= radius_m)
        .collect();

    // One pass over the price rows instead of one per station.
    let mut by_station: HashMap<&str, Vec<FuelTypePrice>> =
        nearby.iter().map(|s| (s.code.as_str(), Vec::new())).collect();
    for price in store.prices() {
        if !fuel_types.contains(&price.fuel_type) {
            continue;
        }
        if let Some(rows) = by_station.get_mut(price.station_code.as_str()) {
            rows.push(price.clone());
        }
    }

    let results: Vec<StationWithPrices> = nearby
        .into_iter()
        .filter_map(|station| {
            let prices = by_station.remove(station.code.as_str())?;
            if prices.is_empty() {
                return None;
            }
            Some(StationWithPrices {
                station: station.clone(),
                prices,
            })
        })
        .collect();

    sort_by_primary(results, fuel_types)
}

fn sort_by_primary(
    results: Vec<StationWithPrices>,
    fuel_types: &FuelTypeFilter,
) -> Vec<StationWithPrices> {
    let primary = fuel_types.primary();

    if fuel_types.len() == 1 {
        let mut results = results;
        results.sort_by(|a, b| compare_price(a, b, primary));
        return results;
    }

    let (mut with_primary, without_primary): (Vec<_>, Vec<_>) = results
        .into_iter()
        .partition(|s| s.price_of(primary).is_some());

    with_primary.sort_by(|a, b| compare_price(a, b, primary));
    with_primary.extend(without_primary);
    with_primary
}

fn compare_price(a: &StationWithPrices, b: &StationWithPrices, fuel_type: &FuelType) -> Ordering {
    let pa = a.price_of(fuel_type).unwrap_or(f64::INFINITY);
    let pb = b.price_of(fuel_type).unwrap_or(f64::INFINITY);
    pa.total_cmp(&pb)
}

#[cfg(test)]
mod tests {
    use super::super::store::test_support::{price, station};
    use super::*;
    use crate::upstream::PriceUpdate;

    /// Gosford, NSW.
    const CENTER: Coordinate = Coordinate::new(-33.4250, 151.3418);

    fn filter(types: &[&str]) -> FuelTypeFilter {
        FuelTypeFilter::new(types.iter().map(|t| FuelType::parse_normalized(t).unwrap())).unwrap()
    }

    fn codes(results: &[StationWithPrices]) -> Vec<&str> {
        results.iter().map(|r| r.station.code.as_str()).collect()
    }

    /// A (E10 1.80), B (E10 1.70, U91 1.90), C (U91 1.60) within a few km,
    /// plus FAR (E10 1.00) about 50 km away.
    fn sample_store() -> PriceStore {
        PriceStore::from_update(PriceUpdate {
            stations: vec![
                station("A", -33.4260, 151.3420),
                station("B", -33.4300, 151.3500),
                station("C", -33.4100, 151.3300),
                station("FAR", -33.8688, 151.2093),
            ],
            prices: vec![
                price("A", "E10", 1.80),
                price("B", "E10", 1.70),
                price("B", "U91", 1.90),
                price("C", "U91", 1.60),
                price("FAR", "E10", 1.00),
            ],
        })
    }

    #[test]
    fn radius_filter_keeps_store_order() {
        let store = sample_store();
        let near = stations_within_radius(&store, CENTER, 5_000.0);
        let codes: Vec<&str> = near.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["A", "B", "C"]);

        let all = stations_within_radius(&store, CENTER, 100_000.0);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn zero_radius_matches_only_exact_location() {
        let store = sample_store();
        let center = store.station("A").unwrap().location;
        let near = stations_within_radius(&store, center, 0.0);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].code, "A");
    }

    #[test]
    fn prices_for_station_returns_all_rows() {
        let store = sample_store();
        let rows = prices_for_station(&store, "B");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.station_code == "B"));
        assert!(prices_for_station(&store, "nope").is_empty());
    }

    #[test]
    fn station_prices_found_and_not_found() {
        let store = sample_store();

        let b = station_prices(&store, "B").unwrap();
        assert_eq!(b.station.code, "B");
        assert_eq!(b.prices, prices_for_station(&store, "B"));

        assert!(station_prices(&store, "Z").is_none());
    }

    #[test]
    fn station_without_prices_still_found() {
        let mut store = sample_store();
        store.merge(PriceUpdate {
            stations: vec![station("NEW", -33.42, 151.34)],
            prices: vec![],
        });

        let view = station_prices(&store, "NEW").unwrap();
        assert!(view.prices.is_empty());
    }

    #[test]
    fn multi_type_partitions_on_primary() {
        let store = sample_store();
        let results = query_radius(&store, CENTER, 5_000.0, &filter(&["E10", "U91"]));
        assert_eq!(codes(&results), ["B", "A", "C"]);

        // B keeps both requested rows.
        assert_eq!(results[0].prices.len(), 2);
    }

    #[test]
    fn single_type_sorts_all_by_price() {
        let store = sample_store();
        let results = query_radius(&store, CENTER, 5_000.0, &filter(&["U91"]));
        assert_eq!(codes(&results), ["C", "B"]);

        // Only the requested type survives.
        assert!(
            results
                .iter()
                .flat_map(|r| &r.prices)
                .all(|p| p.fuel_type.as_str() == "U91")
        );
    }

    #[test]
    fn primary_order_follows_caller() {
        let store = sample_store();
        let results = query_radius(&store, CENTER, 5_000.0, &filter(&["U91", "E10"]));
        // C (U91 1.60) then B (U91 1.90), then A, which lacks U91.
        assert_eq!(codes(&results), ["C", "B", "A"]);
    }

    #[test]
    fn stations_without_requested_types_are_dropped() {
        let store = sample_store();
        let results = query_radius(&store, CENTER, 5_000.0, &filter(&["DL"]));
        assert!(results.is_empty());
    }

    #[test]
    fn never_returns_stations_outside_radius() {
        let store = sample_store();
        for radius in [0.0, 500.0, 2_000.0, 5_000.0, 60_000.0] {
            let results = query_radius(&store, CENTER, radius, &filter(&["E10", "U91"]));
            for r in &results {
                assert!(distance(CENTER, r.station.location) <= radius);
                assert!(!r.prices.is_empty());
            }
        }
    }

    #[test]
    fn far_station_appears_with_large_radius() {
        let store = sample_store();
        let results = query_radius(&store, CENTER, 60_000.0, &filter(&["E10"]));
        assert_eq!(codes(&results), ["FAR", "B", "A"]);
    }

    #[test]
    fn equal_prices_keep_store_order() {
        let store = PriceStore::from_update(PriceUpdate {
            stations: vec![
                station("X", -33.425, 151.342),
                station("Y", -33.425, 151.342),
                station("Z", -33.425, 151.342),
            ],
            prices: vec![
                price("X", "E10", 1.5),
                price("Y", "E10", 1.4),
                price("Z", "E10", 1.5),
            ],
        });

        let results = query_radius(&store, CENTER, 1_000.0, &filter(&["E10"]));
        assert_eq!(codes(&results), ["Y", "X", "Z"]);
    }

    #[test]
    fn orphan_prices_are_ignored() {
        let store = PriceStore::from_update(PriceUpdate {
            stations: vec![],
            prices: vec![price("GHOST", "E10", 1.0)],
        });

        assert!(query_radius(&store, CENTER, 1_000_000.0, &filter(&["E10"])).is_empty());
    }
}
