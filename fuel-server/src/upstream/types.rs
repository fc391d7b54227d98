//! FuelCheck API response DTOs.
//!
//! These types map directly to the NSW FuelCheck JSON payloads. Field names
//! follow the upstream spelling (`stationcode`, `fueltype`, ...). Station
//! codes arrive as numbers from some endpoints and strings from others, so
//! they are decoded leniently.

use serde::{Deserialize, Deserializer, Serialize};

/// Response from the full (`/fuel/prices`) and incremental
/// (`/fuel/prices/new`) price endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PricesResponse {
    #[serde(default)]
    pub stations: Vec<StationDto>,

    #[serde(default)]
    pub prices: Vec<PriceDto>,
}

/// A station as sent by FuelCheck.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    #[serde(rename = "brandid", default, deserialize_with = "string_or_number")]
    pub brand_id: String,

    #[serde(rename = "stationid", default, deserialize_with = "string_or_number")]
    pub station_id: String,

    #[serde(default)]
    pub brand: String,

    #[serde(deserialize_with = "string_or_number")]
    pub code: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub address: String,

    pub location: LocationDto,

    /// Whether AdBlue is sold here. Missing on older payloads.
    #[serde(default)]
    pub is_ad_blue_available: bool,
}

/// Station location in decimal degrees.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LocationDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// One price row as sent by FuelCheck.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceDto {
    #[serde(deserialize_with = "string_or_number")]
    pub stationcode: String,

    pub fueltype: String,

    pub price: f64,

    /// Upstream timestamp, e.g. "19/10/2026 09:15:02".
    #[serde(default)]
    pub lastupdated: String,
}

/// Response from the OAuth client-credentials endpoint.
///
/// Only `access_token` is needed; the rest is kept for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,

    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds, sent as a string.
    #[serde(default)]
    pub expires_in: Option<String>,

    #[serde(default)]
    pub issued_at: Option<String>,
}

/// Accept either a JSON string or a JSON number and keep it as a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Integer(n) => n.to_string(),
        StringOrNumber::Float(n) => n.to_string(),
    })
}
