//! Coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validation.
    ///
    /// Upstream data is trusted as-is; use [`Coordinate::parse`] for
    /// client-supplied values.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting out-of-range or non-finite values.
    ///
    /// # Examples
    ///
    /// ```
    /// use fuel_server::domain::Coordinate;
    ///
    /// assert!(Coordinate::parse(-33.86, 151.21).is_ok());
    /// assert!(Coordinate::parse(91.0, 0.0).is_err());
    /// assert!(Coordinate::parse(0.0, f64::NAN).is_err());
    /// ```
    pub fn parse(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self::new(latitude, longitude))
    }
}

/// Great-circle distance between two coordinates in meters.
///
/// Uses the haversine formula on a spherical Earth of radius
/// [`EARTH_RADIUS_M`].
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_M * c
}

/// Validate a search radius in meters.
pub fn parse_radius(radius_m: f64) -> Result<f64, DomainError> {
    if radius_m.is_finite() && radius_m >= 0.0 {
        Ok(radius_m)
    } else {
        Err(DomainError::InvalidRadius(radius_m))
    }
}
