//! Client library for the OpenWeatherMap HTTP API.
//!
//! This crate defines:
//! - Precondition validators with templated failure messages
//! - A thin JSON-over-HTTP request client (`JsonParser`) with
//!   callback-based delivery and a fixed request deadline
//! - Validated location accessors and typed weather/forecast reports
//!
//! The request client is generic over its [`Transport`], so tests and
//! other consumers can substitute the reqwest-backed default.

pub mod config;
pub mod current;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod parser;
pub mod validate;

pub use config::{Options, Units};
pub use current::CurrentWeather;
pub use error::{Error, Result};
pub use forecast::Forecast;
pub use location::{Location, LocationType};
pub use model::{ForecastReport, WeatherEntry, WeatherReport};
pub use parser::{Failure, HttpTransport, JsonParser, ReadyState, Request, Transport};
