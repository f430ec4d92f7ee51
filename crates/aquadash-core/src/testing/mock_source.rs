//! Scriptable status source for testing.
//!
//! Responses are queued and handed out in order; once the queue is empty the
//! fallback response (if any) is repeated. Every fetch goes through the same
//! status/body decoding as the HTTP source, so malformed bodies and error
//! statuses behave exactly like the real thing.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::error::FetchError;
use crate::stats::{decode_response, StatsSource, StatusDocument};

/// Mock status source.
///
/// # Example
///
/// ```ignore
/// let source = MockStatsSource::builder()
///     .respond(MockResponse::status_doc(30_000, 1000, &["b", "a"]))
///     .respond(MockResponse::error(502))
///     .build();
///
/// let doc = source.fetch().await?;
/// source.assert_called_times(1);
/// ```
#[derive(Clone)]
pub struct MockStatsSource {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    fallback: Arc<Mutex<Option<MockResponse>>>,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

/// A scripted response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
    /// Simulated latency.
    pub delay: Duration,
    /// Fail at the network level instead of returning a response.
    pub network_error: bool,
}

impl MockResponse {
    /// A 200 response with a JSON body.
    pub fn json<T: Serialize>(body: T) -> Self {
        Self {
            status: 200,
            body: serde_json::to_string(&body).unwrap_or_default(),
            delay: Duration::ZERO,
            network_error: false,
        }
    }

    /// A 200 response with a minimal status document.
    pub fn status_doc(height: u64, now: i64, miners: &[&str]) -> Self {
        let miners: Vec<_> = miners
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect();
        Self::json(serde_json::json!({
            "height": height,
            "now": now,
            "miners": miners,
        }))
    }

    /// A 200 response with an arbitrary raw body.
    pub fn raw(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            delay: Duration::ZERO,
            network_error: false,
        }
    }

    /// An error status with an empty JSON body.
    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: "{}".to_string(),
            delay: Duration::ZERO,
            network_error: false,
        }
    }

    /// A connection failure.
    pub fn network_error() -> Self {
        Self {
            status: 0,
            body: String::new(),
            delay: Duration::ZERO,
            network_error: true,
        }
    }

    /// Delay the response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn resolve(&self) -> Result<StatusDocument, FetchError> {
        if self.network_error {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        decode_response(self.status, self.body.as_bytes())
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockStatsSource {
    /// Create a source with no scripted responses.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a builder.
    pub fn builder() -> MockStatsSourceBuilder {
        MockStatsSourceBuilder::new()
    }

    /// Queue a response.
    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Response repeated once the queue is drained.
    pub fn set_fallback(&self, response: MockResponse) {
        *self.fallback.lock().unwrap() = Some(response);
    }

    /// Number of fetches started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Option<MockResponse> {
        let queued = self.responses.lock().unwrap().pop_front();
        queued.or_else(|| self.fallback.lock().unwrap().clone())
    }

    // =========================================================================
    // VERIFICATION METHODS
    // =========================================================================

    /// Assert that the source was fetched a specific number of times.
    pub fn assert_called_times(&self, expected: usize) {
        let calls = self.calls();
        assert_eq!(
            calls, expected,
            "Expected {} fetches, but found {}",
            expected, calls
        );
    }

    /// Assert that fetches never overlapped.
    pub fn assert_never_overlapped(&self) {
        let max = self.max_in_flight();
        assert!(
            max <= 1,
            "Expected at most one fetch in flight, but saw {}",
            max
        );
    }
}

impl Default for MockStatsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsSource for MockStatsSource {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<StatusDocument, FetchError>> + Send + '_>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            let _guard = InFlight(&self.in_flight);

            let Some(response) = self.next_response() else {
                return Err(FetchError::Network("no mock response queued".to_string()));
            };

            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }

            response.resolve()
        })
    }

    fn describe(&self) -> String {
        "mock://stats".to_string()
    }
}

/// Builder for MockStatsSource.
pub struct MockStatsSourceBuilder {
    responses: Vec<MockResponse>,
    fallback: Option<MockResponse>,
}

impl MockStatsSourceBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            fallback: None,
        }
    }

    /// Queue a response.
    pub fn respond(mut self, response: MockResponse) -> Self {
        self.responses.push(response);
        self
    }

    /// Repeat this response once the queue is drained.
    pub fn then_always(mut self, response: MockResponse) -> Self {
        self.fallback = Some(response);
        self
    }

    /// Build the MockStatsSource.
    pub fn build(self) -> MockStatsSource {
        let source = MockStatsSource::new();
        for response in self.responses {
            source.push(response);
        }
        if let Some(fallback) = self.fallback {
            source.set_fallback(fallback);
        }
        source
    }
}

impl Default for MockStatsSourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::fetch_and_transform;

    #[test]
    fn test_mock_response_status_doc() {
        let response = MockResponse::status_doc(5, 10, &["x"]);
        assert_eq!(response.status, 200);
        let doc = response.resolve().unwrap();
        assert_eq!(doc.height, 5);
        assert_eq!(doc.miners.unwrap()[0].name, "x");
    }

    #[tokio::test]
    async fn test_queue_then_fallback() {
        let source = MockStatsSource::builder()
            .respond(MockResponse::error(500))
            .then_always(MockResponse::status_doc(1, 2, &[]))
            .build();

        assert_eq!(source.fetch().await, Err(FetchError::Status(500)));
        assert!(source.fetch().await.is_ok());
        assert!(source.fetch().await.is_ok());
        source.assert_called_times(3);
    }

    #[tokio::test]
    async fn test_empty_source_fails() {
        let source = MockStatsSource::new();
        assert!(matches!(source.fetch().await, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_network_and_decode_errors() {
        let source = MockStatsSource::builder()
            .respond(MockResponse::network_error())
            .respond(MockResponse::raw("<html>502</html>"))
            .build();

        assert!(matches!(source.fetch().await, Err(FetchError::Network(_))));
        assert!(matches!(source.fetch().await, Err(FetchError::Decode(_))));
    }

    #[tokio::test]
    async fn test_fetch_and_transform_sorts() {
        let source = MockStatsSource::builder()
            .respond(MockResponse::status_doc(30_000, 1000, &["bravo", "alpha", "charlie"]))
            .build();

        let display = fetch_and_transform(&source).await.unwrap();
        assert_eq!(display.miner_names(), vec!["alpha", "bravo", "charlie"]);
        assert_eq!(display.next_epoch, 432_001_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlap_tracking() {
        let source = MockStatsSource::builder()
            .then_always(MockResponse::status_doc(1, 1, &[]).with_delay(Duration::from_secs(1)))
            .build();

        source.fetch().await.unwrap();
        source.fetch().await.unwrap();
        source.assert_never_overlapped();

        let results = futures::future::join_all((0..3).map(|_| source.fetch())).await;
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(source.max_in_flight(), 3);
        source.assert_called_times(5);
    }
}
