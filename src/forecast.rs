//! Forecast accessor.

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::config::Options;
use crate::error::{Error, Result};
use crate::location::Location;
use crate::model::{ForecastReport, WeatherEntry, unix_to_utc};
use crate::parser::{HttpTransport, JsonParser, Request, Transport};

const ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Fetches the forecast for a [`Location`] and delivers a typed
/// [`ForecastReport`] through a success callback, one entry per 3-hour
/// slot.
#[derive(Debug)]
pub struct Forecast<T: Transport = HttpTransport> {
    parser: JsonParser<T>,
    options: Options,
}

impl Forecast<HttpTransport> {
    pub fn new(options: Options) -> Self {
        Self::with_transport(HttpTransport::new(), options)
    }
}

impl<T: Transport> Forecast<T> {
    pub fn with_transport(transport: T, options: Options) -> Self {
        let mut parser = JsonParser::with_transport(transport);
        if let Some(timeout) = options.timeout_duration() {
            parser = parser.with_timeout(timeout);
        }

        Self { parser, options }
    }

    /// Issues one GET to the forecast endpoint. On a 200 response
    /// `on_success` receives the decoded report and the request handle;
    /// HTTP failures and timeouts reach `on_error` untouched.
    pub async fn hourly<S, E>(
        &self,
        location: &Location,
        on_success: S,
        on_error: E,
    ) -> Result<Request>
    where
        S: FnOnce(ForecastReport, &Request) + Send,
        E: FnOnce(&Request) + Send,
    {
        let url = self.options.request_url(ENDPOINT, location)?;
        debug!(kind = %location.kind(), "fetching hourly forecast");

        let mut decoded: Option<Result<ForecastReport>> = None;
        let mut failed = false;
        let request = {
            let slot = &mut decoded;
            let flag = &mut failed;
            self.parser
                .parse(
                    &url,
                    Some(Box::new(move |value, _request: &Request| {
                        *slot = Some(
                            serde_json::from_value::<RawForecast>(value)
                                .map(RawForecast::into_report)
                                .map_err(|err| {
                                    Error::TypeMismatch(format!(
                                        "Unexpected forecast payload: {err}"
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
struct RawCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct RawSlot {
    dt: i64,
    main: RawMain,
    weather: Vec<RawCondition>,
    wind: RawWind,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    city: RawCity,
    list: Vec<RawSlot>,
}

impl RawForecast {
    fn into_report(self) -> ForecastReport {
        let entries = self
            .list
            .into_iter()
            .map(|slot| {
                let condition = slot
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_else(|| "Unknown".to_owned());

                WeatherEntry {
                    time: unix_to_utc(slot.dt).unwrap_or_else(Utc::now),
                    temperature: slot.main.temp,
                    pressure: slot.main.pressure,
                    humidity: slot.main.humidity,
                    condition,
                    wind_speed: slot.wind.speed,
                }
            })
            .collect();

        ForecastReport {
            city: self.city.name,
            country: self.city.country,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TransportResponse;
    use async_trait::async_trait;

    const FORECAST_BODY: &str = r#"{
        "city": {"name": "London", "country": "GB"},
        "list": [
            {
                "dt": 1459468800,
                "main": {"temp": 7.9, "pressure": 1009.0, "humidity": 72},
                "weather": [{"description": "scattered clouds"}],
                "wind": {"speed": 4.4}
            },
            {
                "dt": 1459479600,
                "main": {"temp": 9.3, "pressure": 1010.0, "humidity": 65},
                "weather": [{"description": "clear sky"}],
                "wind": {"speed": 3.8}
            }
        ]
    }"#;

    struct StaticTransport {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn fetch(&self, _url: &str) -> Result<TransportResponse> {
            Ok(TransportResponse {
                status: self.status,
                body: self.body.to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn delivers_typed_report_with_one_entry_per_slot() {
        let client = Forecast::with_transport(
            StaticTransport {
                status: 200,
                body: FORECAST_BODY,
            },
            Options::new("KEY"),
        );
        let location = Location::by_name("London,uk").unwrap();

        let mut report = None;
        let mut error_fired = false;

        let request = client
            .hourly(
                &location,
                |r, _request| report = Some(r),
                |_request| error_fired = true,
            )
            .await
            .unwrap();

        let report = report.expect("success callback should fire");
        assert!(!error_fired);
        assert!(request.is_done());
        assert_eq!(report.city, "London");
        assert_eq!(report.country, "GB");
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].condition, "scattered clouds");
        assert_eq!(report.entries[1].temperature, 9.3);
        assert_eq!(report.entries[0].time, unix_to_utc(1459468800).unwrap());
    }

    #[tokio::test]
    async fn http_failure_reaches_error_callback() {
        let client = Forecast::with_transport(
            StaticTransport {
                status: 404,
                body: "Not Found",
            },
            Options::new("KEY"),
        );
        let location = Location::by_coordinates(51.51, -0.13).unwrap();

        let mut success_fired = false;
        let mut error_status = None;

        client
            .hourly(
                &location,
                |_report, _request| success_fired = true,
                |request| error_status = request.status(),
            )
            .await
            .unwrap();

        assert!(!success_fired);
        assert_eq!(error_status, Some(404));
    }

    #[tokio::test]
    async fn unexpected_payload_shape_is_a_type_mismatch() {
        let client = Forecast::with_transport(
            StaticTransport {
                status: 200,
                body: r#"{"list": "nope"}"#,
            },
            Options::new("KEY"),
        );
        let location = Location::by_name("London,uk").unwrap();

        let err = client
            .hourly(&location, |_report, _request| {}, |_request| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TypeMismatch(_)));
    }
}
