//! Pure mapping from weather records to display-ready entries.
//!
//! Icon and color lookups are fixed tables with an explicit fallback;
//! nothing in this module can fail or panic.

use chrono::NaiveDateTime;

use crate::types::WeatherRecord;

/// Fallback glyph for weather names outside the master list.
const FALLBACK_ICON: &str = "❓";

/// Neutral card background for unknown weather names.
const FALLBACK_COLOR: &str = "#ffffff";

const WEATHER_ICONS: &[(&str, &str)] = &[("晴れ", "☀️"), ("くもり", "☁️"), ("雨", "🌧️")];

const WEATHER_COLORS: &[(&str, &str)] = &[
    ("晴れ", "#fff3e0"),
    ("くもり", "#eceff1"),
    ("雨", "#e3f2fd"),
];

/// Display-ready weather card contents. Built per render pass, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherViewEntry {
    pub city_name: String,
    pub icon: &'static str,
    pub background_color: &'static str,
    pub weather_name: String,
    pub rainfall_probability: u8,
    pub formatted_time: String,
}

/// Icon glyph for a weather name.
pub fn icon_for(weather_name: &str) -> &'static str {
    WEATHER_ICONS
        .iter()
        .find(|(name, _)| *name == weather_name)
        .map(|(_, icon)| *icon)
        .unwrap_or(FALLBACK_ICON)
}

/// Card background color for a weather name.
pub fn color_for(weather_name: &str) -> &'static str {
    WEATHER_COLORS
        .iter()
        .find(|(name, _)| *name == weather_name)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// Format an ISO-8601 timestamp as `YYYY/MM/DD HH:MM`.
///
/// Absent or empty timestamps render as an empty string; unparseable
/// ones are returned unchanged.
pub fn format_timestamp(timestamp: Option<&str>) -> String {
    let Some(raw) = timestamp else {
        return String::new();
    };
    if raw.is_empty() {
        return String::new();
    }

    match parse_iso8601(raw) {
        Some(dt) => dt.format("%Y/%m/%d %H:%M").to_string(),
        None => raw.to_string(),
    }
}

fn parse_iso8601(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    // The backend emits naive UTC timestamps without an offset.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

/// Build the display entry for one record.
pub fn to_view_entry(record: &WeatherRecord) -> WeatherViewEntry {
    WeatherViewEntry {
        city_name: record.city_name.clone(),
        icon: icon_for(&record.weather_name),
        background_color: color_for(&record.weather_name),
        weather_name: record.weather_name.clone(),
        rainfall_probability: record.rainfall_probability,
        formatted_time: format_timestamp(record.timestamp.as_deref()),
    }
}
