//! Wire types for the weather API.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One city's weather record as returned by the backend.
///
/// Values are passed through as-is: `rainfall_probability` is a
/// percentage that is not bounds-checked here, and `weather_name` is not
/// validated against the master list. `city_id` is unique within a
/// single fetch result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    #[serde(rename = "CityId")]
    pub city_id: u32,

    #[serde(rename = "CityName")]
    pub city_name: String,

    /// Weather type id; present in real payloads but tolerated if absent.
    #[serde(rename = "WeatherId", default, skip_serializing_if = "Option::is_none")]
    pub weather_id: Option<u32>,

    #[serde(rename = "WeatherName")]
    pub weather_name: String,

    #[serde(rename = "RainfallProbability")]
    pub rainfall_probability: u8,

    /// ISO-8601 timestamp of the record, may be absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Envelope of `GET /weather`.
///
/// A missing `data` field means an empty result set, not an error.
#[derive(Debug, Deserialize)]
pub struct FetchResponse {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub data: Vec<WeatherRecord>,

    #[serde(default)]
    pub count: Option<u64>,
}

/// Aggregate statistics over the current data set (`GET /weather/statistics`).
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherStatistics {
    pub total_cities: u32,
    pub data_available: u32,
    #[serde(default)]
    pub weather_distribution: HashMap<String, u32>,
    pub average_rainfall: f64,
}

#[derive(Debug, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: WeatherStatistics,
}

/// Entry of the weather-type master list (`GET /weather/types`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherType {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherTypesResponse {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub data: Vec<WeatherType>,
}

/// Service health report (`GET /health`).
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
    pub database: String,
}
