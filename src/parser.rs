//! Thin JSON-over-HTTP request client.
//!
//! [`JsonParser::parse`] issues exactly one GET request, validates the URL
//! before any network activity, and dispatches exactly one of two callbacks
//! once the request reaches its terminal state: the success callback when
//! the status is 200, the error callback otherwise. A fixed 2000 ms
//! deadline is armed at send time; on expiry the in-flight request is
//! dropped and the outcome is routed through the error callback with
//! [`Failure::TimedOut`] recorded on the request handle.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::validate;

/// Deadline armed at send time for every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

/// Status code that selects the success callback.
pub const OK: u16 = 200;

/// Lifecycle of a single request, from construction to the terminal
/// [`ReadyState::ResponseReady`] state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    NotInitialized,
    ConnectionEstablished,
    RequestReceived,
    Processing,
    ResponseReady,
}

/// Failure recorded on a request that never reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    TimedOut,
}

/// One-shot record of an in-flight GET. A fresh `Request` is created per
/// [`JsonParser::parse`] call; requests are never pooled or shared.
#[derive(Debug)]
pub struct Request {
    url: String,
    state: ReadyState,
    status: Option<u16>,
    body: Option<String>,
    failure: Option<Failure>,
}

impl Request {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            state: ReadyState::NotInitialized,
            status: None,
            body: None,
            failure: None,
        }
    }

    fn advance(&mut self, state: ReadyState) {
        debug!(url = %self.url, ?state, "request state change");
        self.state = state;
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ReadyState {
        self.state
    }

    /// Final HTTP status, set once the response headers were received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Raw response body, set once the terminal state is reached.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn failure(&self) -> Option<Failure> {
        self.failure
    }

    pub fn is_done(&self) -> bool {
        self.state == ReadyState::ResponseReady
    }
}

/// Raw outcome of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Abstraction over HTTP request execution, allowing tests to substitute a
/// mock implementation for the reqwest-backed [`HttpTransport`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<TransportResponse>;
}

/// Production transport backed by a dedicated reqwest client. No vendor
/// fallback chain and no shared singleton: each parser owns its transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<TransportResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

/// Callback fired on a 200 response with the parsed body and the request
/// handle.
pub type SuccessFn<'a> = Box<dyn FnOnce(Value, &Request) + Send + 'a>;

/// Callback fired on a non-200 response or timeout with the request handle.
pub type ErrorFn<'a> = Box<dyn FnOnce(&Request) + Send + 'a>;

/// Request client wrapping a single [`Transport`].
#[derive(Debug)]
pub struct JsonParser<T: Transport = HttpTransport> {
    transport: T,
    timeout: Duration,
}

impl JsonParser<HttpTransport> {
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl Default for JsonParser<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> JsonParser<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the default 2000 ms deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Issues one GET request to `url` and dispatches at most one of the
    /// two callbacks.
    ///
    /// The URL is validated first; a malformed URL fails with
    /// [`Error::TypeMismatch`] before any network activity. On timeout the
    /// request records [`Failure::TimedOut`] and the error callback fires;
    /// only when no error callback is attached does the timeout surface as
    /// [`Error::Timeout`]. Connection-level failures surface as
    /// [`Error::Transport`]. A 200 response whose body is not a JSON
    /// document fails with [`Error::TypeMismatch`] and fires no callback.
    pub async fn parse<'a>(
        &self,
        url: &str,
        on_success: Option<SuccessFn<'a>>,
        on_error: Option<ErrorFn<'a>>,
    ) -> Result<Request> {
        validate::require_url(url, "URL is invalid.")?;

        let mut request = Request::new(url);
        request.advance(ReadyState::ConnectionEstablished);

        let outcome = tokio::time::timeout(self.timeout, self.transport.fetch(url)).await;

        let response = match outcome {
            Ok(response) => response?,
            Err(_) => {
                warn!(url, timeout_ms = self.timeout.as_millis() as u64, "request timed out");
                request.failure = Some(Failure::TimedOut);

                return match on_error {
                    Some(on_error) => {
                        on_error(&request);
                        Ok(request)
                    }
                    None => Err(Error::Timeout(self.timeout)),
                };
            }
        };

        request.advance(ReadyState::RequestReceived);
        request.status = Some(response.status);
        request.advance(ReadyState::Processing);
        request.body = Some(response.body);
        request.advance(ReadyState::ResponseReady);

        // Single dispatch point: at most one of the two callbacks fires,
        // at most once, selected by the captured status.
        if response.status == OK {
            if let Some(on_success) = on_success {
                let body = request.body.as_deref().unwrap_or_default();
                let parsed = validate::require_json(body, "Response is not a JSON document.")?;
                on_success(parsed, &request);
            }
        } else if let Some(on_error) = on_error {
            on_error(&request);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticTransport {
        status: u16,
        body: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl StaticTransport {
        fn new(status: u16, body: &'static str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let transport = Self {
                status,
                body,
                calls: Arc::clone(&calls),
            };
            (transport, calls)
        }
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn fetch(&self, _url: &str) -> Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TransportResponse {
                status: self.status,
                body: self.body.to_owned(),
            })
        }
    }

    struct StalledTransport;

    #[async_trait]
    impl Transport for StalledTransport {
        async fn fetch(&self, _url: &str) -> Result<TransportResponse> {
            std::future::pending::<Result<TransportResponse>>().await
        }
    }

    #[tokio::test]
    async fn success_callback_fires_once_with_parsed_body() {
        let (transport, _) = StaticTransport::new(200, r#"{"temp":20}"#);
        let parser = JsonParser::with_transport(transport);

        let mut seen = None;
        let mut error_fired = false;

        let request = parser
            .parse(
                "http://api.openweathermap.org/data/2.5/weather",
                Some(Box::new(|value, request: &Request| {
                    assert_eq!(request.status(), Some(200));
                    seen = Some(value);
                })),
                Some(Box::new(|_request: &Request| error_fired = true)),
            )
            .await
            .unwrap();

        assert_eq!(seen, Some(json!({"temp": 20})));
        assert!(!error_fired);
        assert!(request.is_done());
        assert_eq!(request.body(), Some(r#"{"temp":20}"#));
    }

    #[tokio::test]
    async fn error_callback_fires_once_on_404() {
        let (transport, _) = StaticTransport::new(404, "Not Found");
        let parser = JsonParser::with_transport(transport);

        let mut success_fired = false;
        let mut error_status = None;

        let request = parser
            .parse(
                "http://api.openweathermap.org/data/2.5/weather",
                Some(Box::new(|_value, _request: &Request| success_fired = true)),
                Some(Box::new(|request: &Request| {
                    error_status = request.status();
                })),
            )
            .await
            .unwrap();

        assert!(!success_fired);
        assert_eq!(error_status, Some(404));
        assert!(request.is_done());
    }

    #[tokio::test]
    async fn invalid_url_fails_before_any_network_activity() {
        let (transport, calls) = StaticTransport::new(200, "{}");
        let parser = JsonParser::with_transport(transport);

        let err = parser.parse("not a url", None, None).await.unwrap_err();

        assert!(matches!(err, Error::TypeMismatch(_)));
        assert_eq!(err.to_string(), "URL is invalid.");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_is_routed_to_error_callback() {
        let parser = JsonParser::with_transport(StalledTransport);

        let mut failure = None;
        let request = parser
            .parse(
                "http://example.com/slow",
                None,
                Some(Box::new(|request: &Request| failure = request.failure())),
            )
            .await
            .unwrap();

        assert_eq!(failure, Some(Failure::TimedOut));
        assert!(!request.is_done());
        assert_eq!(request.status(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_without_error_callback_surfaces_as_error() {
        let parser =
            JsonParser::with_transport(StalledTransport).with_timeout(Duration::from_millis(50));

        let err = parser
            .parse("http://example.com/slow", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn non_json_success_body_is_a_type_mismatch() {
        let (transport, _) = StaticTransport::new(200, "not json");
        let parser = JsonParser::with_transport(transport);

        let mut success_fired = false;
        let err = parser
            .parse(
                "http://example.com/data",
                Some(Box::new(|_value, _request: &Request| success_fired = true)),
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::TypeMismatch(_)));
        assert!(!success_fired);
    }

    #[tokio::test]
    async fn overlapping_calls_use_independent_requests() {
        let (transport, calls) = StaticTransport::new(200, "{}");
        let parser = JsonParser::with_transport(transport);

        let first = parser.parse("http://example.com/a", None, None);
        let second = parser.parse("http://example.com/b", None, None);
        let (first, second) = tokio::join!(first, second);

        assert_eq!(first.unwrap().url(), "http://example.com/a");
        assert_eq!(second.unwrap().url(), "http://example.com/b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
