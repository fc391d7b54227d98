//! Conversion from FuelCheck DTOs to domain types.

use tracing::warn;

use crate::domain::{Coordinate, FuelType, FuelTypePrice, Station};

use super::types::{PriceDto, PricesResponse, StationDto};

/// Stations and prices decoded from one upstream payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceUpdate {
    pub stations: Vec<Station>,
    pub prices: Vec<FuelTypePrice>,
}

impl PriceUpdate {
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty() && self.prices.is_empty()
    }
}

/// Convert a prices response to domain types.
///
/// Price rows with a blank fuel type are skipped with a warning rather
/// than failing the whole payload.
pub fn convert_prices_response(response: PricesResponse) -> PriceUpdate {
    let stations = response.stations.into_iter().map(convert_station).collect();

    let mut prices = Vec::with_capacity(response.prices.len());
    for dto in response.prices {
        match convert_price(dto) {
            Ok(price) => prices.push(price),
            Err(dto) => warn!(
                station_code = %dto.stationcode,
                fuel_type = %dto.fueltype,
                "skipping price row with blank fuel type"
            ),
        }
    }

    PriceUpdate { stations, prices }
}

fn convert_station(dto: StationDto) -> Station {
    Station {
        brand_id: dto.brand_id,
        station_id: dto.station_id,
        brand: dto.brand,
        code: dto.code,
        name: dto.name,
        address: dto.address,
        location: Coordinate::new(dto.location.latitude, dto.location.longitude),
        is_ad_blue_available: dto.is_ad_blue_available,
    }
}

/// Returns the DTO back on failure so the caller can log it.
fn convert_price(dto: PriceDto) -> Result<FuelTypePrice, PriceDto> {
    let Ok(fuel_type) = FuelType::from_upstream(&dto.fueltype) else {
        return Err(dto);
    };

    Ok(FuelTypePrice {
        station_code: dto.stationcode,
        fuel_type,
        price: dto.price,
        last_updated: dto.lastupdated,
    })
}
