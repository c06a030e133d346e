//! Validated location accessors.
//!
//! A [`Location`] identifies a place the way the OpenWeatherMap API
//! understands it: by city id, by name, by geographic coordinates, or by
//! zip code. Exactly one constructor exists per [`LocationType`], and every
//! constructor validates its input before the value can reach a request.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    Id,
    Name,
    Coordinates,
    Zip,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Id => "id",
            LocationType::Name => "name",
            LocationType::Coordinates => "coordinates",
            LocationType::Zip => "zip",
        }
    }

    pub const fn all() -> &'static [LocationType] {
        &[
            LocationType::Id,
            LocationType::Name,
            LocationType::Coordinates,
            LocationType::Zip,
        ]
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated place to fetch weather for.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    kind: LocationType,
    id: Option<i64>,
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    zip: Option<String>,
    country: Option<String>,
}

impl Location {
    fn empty(kind: LocationType) -> Self {
        Self {
            kind,
            id: None,
            name: None,
            latitude: None,
            longitude: None,
            zip: None,
            country: None,
        }
    }

    /// City id, as listed by the API's city index.
    pub fn by_id(id: i64) -> Result<Self> {
        validate::require_in_range(
            &Value::from(id),
            1.0,
            99_999_999.0,
            "Location id value should be between @1 and @2",
        )?;

        Ok(Self {
            id: Some(id),
            ..Self::empty(LocationType::Id)
        })
    }

    /// City name, optionally suffixed with a country code ("London,uk").
    pub fn by_name(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::TypeMismatch("Location name is invalid.".to_owned()));
        }

        Ok(Self {
            name: Some(name.to_owned()),
            ..Self::empty(LocationType::Name)
        })
    }

    /// Geographic coordinates. Non-finite values fail the type check,
    /// out-of-range values the range check.
    pub fn by_coordinates(latitude: f64, longitude: f64) -> Result<Self> {
        validate::require_in_range(
            &Value::from(latitude),
            -90.0,
            90.0,
            "Location latitude is invalid.",
        )?;
        validate::require_in_range(
            &Value::from(longitude),
            -180.0,
            180.0,
            "Location longitude is invalid.",
        )?;

        Ok(Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::empty(LocationType::Coordinates)
        })
    }

    /// Zip code with a country code.
    pub fn by_zip(zip: &str, country: &str) -> Result<Self> {
        if zip.trim().is_empty() {
            return Err(Error::TypeMismatch("Location zip is invalid.".to_owned()));
        }
        if country.trim().is_empty() {
            return Err(Error::TypeMismatch("Location country is invalid.".to_owned()));
        }

        Ok(Self {
            zip: Some(zip.to_owned()),
            country: Some(country.to_owned()),
            ..Self::empty(LocationType::Zip)
        })
    }

    pub fn kind(&self) -> LocationType {
        self.kind
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn zip(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// Query pairs addressing this location, as the API expects them.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(id) = self.id {
            params.push(("id", id.to_string()));
        }
        if let Some(name) = &self.name {
            params.push(("q", name.clone()));
        }
        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            params.push(("lat", lat.to_string()));
            params.push(("lon", lon.to_string()));
        }
        if let (Some(zip), Some(country)) = (&self.zip, &self.country) {
            params.push(("zip", format!("{zip},{country}")));
        }

        params
    }
}
