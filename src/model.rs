use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weather observation or forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEntry {
    pub time: DateTime<Utc>,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: u8,
    pub condition: String,
    pub wind_speed: f64,
}

/// Current weather at a single location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub entry: WeatherEntry,
}

/// Forecast for a location, one entry per 3-hour slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub city: String,
    pub country: String,
    pub entries: Vec<WeatherEntry>,
}

pub(crate) fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
