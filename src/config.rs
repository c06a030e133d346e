//! In-memory client options. Nothing is persisted to disk; the caller
//! constructs an [`Options`] value and hands it to the accessor objects.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::Location;

/// Measurement units requested from the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kelvin, the API default.
    Standard,
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }
}

/// Options shared by [`crate::CurrentWeather`] and [`crate::Forecast`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// OpenWeatherMap API key, sent as the `APPID` query parameter.
    pub api_key: String,

    #[serde(default)]
    pub units: Units,

    /// Overrides the parser's 2000 ms deadline when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Options {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            units: Units::default(),
            timeout_ms: None,
        }
    }

    pub fn units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub(crate) fn timeout_duration(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Builds the percent-encoded request URL for `endpoint` addressing
    /// `location`.
    pub(crate) fn request_url(&self, endpoint: &str, location: &Location) -> Result<String> {
        let mut params = location.query_params();
        params.push(("units", self.units.as_str().to_owned()));
        params.push(("APPID", self.api_key.clone()));

        let url = reqwest::Url::parse_with_params(endpoint, &params)
            .map_err(|err| Error::TypeMismatch(format!("Invalid endpoint URL: {err}")))?;

        Ok(url.into())
    }
}
