//! Current-weather accessor.

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::config::Options;
use crate::error::{Error, Result};
use crate::location::Location;
use crate::model::{WeatherEntry, WeatherReport, unix_to_utc};
use crate::parser::{HttpTransport, JsonParser, Request, Transport};

const ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Fetches the current weather for a [`Location`] and delivers a typed
/// [`WeatherReport`] through a success callback.
#[derive(Debug)]
pub struct CurrentWeather<T: Transport = HttpTransport> {
    parser: JsonParser<T>,
    options: Options,
}

impl CurrentWeather<HttpTransport> {
    pub fn new(options: Options) -> Self {
        Self::with_transport(HttpTransport::new(), options)
    }
}

impl<T: Transport> CurrentWeather<T> {
    pub fn with_transport(transport: T, options: Options) -> Self {
        let mut parser = JsonParser::with_transport(transport);
        if let Some(timeout) = options.timeout_duration() {
            parser = parser.with_timeout(timeout);
        }

        Self { parser, options }
    }

    /// Issues one GET to the current-weather endpoint. On a 200 response
    /// `on_success` receives the decoded report and the request handle;
    /// HTTP failures and timeouts reach `on_error` untouched. A 200 payload
    /// of an unexpected shape fails with [`Error::TypeMismatch`].
    pub async fn by_location<S, E>(
        &self,
        location: &Location,
        on_success: S,
        on_error: E,
    ) -> Result<Request>
    where
        S: FnOnce(WeatherReport, &Request) + Send,
        E: FnOnce(&Request) + Send,
    {
        let url = self.options.request_url(ENDPOINT, location)?;
        debug!(kind = %location.kind(), "fetching current weather");

        let mut decoded: Option<Result<WeatherReport>> = None;
        let mut failed = false;
        let request = {
            let slot = &mut decoded;
            let flag = &mut failed;
            self.parser
                .parse(
                    &url,
                    Some(Box::new(move |value, _request: &Request| {
                        *slot = Some(
                            serde_json::from_value::<RawCurrent>(value)
                                .map(RawCurrent::into_report)
                                .map_err(|err| {
                                    Error::TypeMismatch(format!(
                                        "Unexpected current weather payload: {err}"
                                    ))
                                }),
                        );
                    })),
                    Some(Box::new(move |_request: &Request| *flag = true)),
                )
                .await?
        };

        match decoded {
            Some(Ok(report)) => {
                on_success(report, &request);
                Ok(request)
            }
            Some(Err(err)) => Err(err),
            None => {
                if failed {
                    on_error(&request);
                }
                Ok(request)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    pressure: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    name: String,
    dt: i64,
    main: RawMain,
    weather: Vec<RawCondition>,
    wind: RawWind,
}

impl RawCurrent {
    fn into_report(self) -> WeatherReport {
        let condition = self
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_owned());

        WeatherReport {
            location_name: self.name,
            entry: WeatherEntry {
                time: unix_to_utc(self.dt).unwrap_or_else(Utc::now),
                temperature: self.main.temp,
                pressure: self.main.pressure,
                humidity: self.main.humidity,
                condition,
                wind_speed: self.wind.speed,
            },
        }
    }
}
