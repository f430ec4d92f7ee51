use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use aquadash_core::config::UpstreamConfig;
use aquadash_core::stats::{decode_response, StatsSource, StatusDocument};
use aquadash_core::{DashError, FetchError};

/// Fetches the status document from the proxy over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpStatsSource {
    /// Create a source for the configured upstream.
    pub fn new(config: &UpstreamConfig) -> aquadash_core::Result<Self> {
        let timeout = config.request_timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("aquadash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config.stats_url(), timeout))
    }

    /// Create a source around an existing client.
    pub fn with_client(client: reqwest::Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    /// Status endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(e.to_string())
        }
    }

    async fn get(&self) -> Result<StatusDocument, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        decode_response(status, &body)
    }
}

impl StatsSource for HttpStatsSource {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<StatusDocument, FetchError>> + Send + '_>> {
        Box::pin(self.get())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn source_for(base: &str, timeout_ms: u64) -> HttpStatsSource {
        HttpStatsSource::new(&UpstreamConfig {
            url: base.to_string(),
            request_timeout_ms: timeout_ms,
        })
        .unwrap()
    }

    #[test]
    fn test_url_from_config() {
        let source = source_for("http://127.0.0.1:8081/", 1000);
        assert_eq!(source.url(), "http://127.0.0.1:8081/stats");
        assert_eq!(source.describe(), "http://127.0.0.1:8081/stats");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let router = Router::new().route(
            "/stats",
            get(|| async {
                axum::Json(serde_json::json!({
                    "height": 12,
                    "now": 99,
                    "miners": [{"name": "b"}, {"name": "a"}]
                }))
            }),
        );
        let base = serve(router).await;

        let doc = source_for(&base, 5000).fetch().await.unwrap();
        assert_eq!(doc.height, 12);
        assert_eq!(doc.now, 99);
        assert_eq!(doc.miners.map(|m| m.len()), Some(2));
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let router = Router::new().route(
            "/stats",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let base = serve(router).await;

        let err = source_for(&base, 5000).fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Status(503));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let router = Router::new().route("/stats", get(|| async { "not json" }));
        let base = serve(router).await;

        let err = source_for(&base, 5000).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let router = Router::new().route(
            "/stats",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "{}"
            }),
        );
        let base = serve(router).await;

        let err = source_for(&base, 50).fetch().await.unwrap_err();
        assert_eq!(err, FetchError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = source_for(&format!("http://{}", addr), 1000)
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }
}
